pub mod audit;
pub mod db_init;
pub mod factory;
pub mod panel;

#[cfg(test)]
pub(crate) mod test_utils;
