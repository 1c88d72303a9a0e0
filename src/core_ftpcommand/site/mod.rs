pub mod handler;
pub mod site_reg;
