//! Sales repositories

mod items;
mod sales;

pub(crate) use items::PgSaleItemsRepository;
pub(crate) use sales::PgSalesRepository;
