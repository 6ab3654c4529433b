pub mod company_store;
