pub mod brain;
pub mod http;
pub mod service;

#[cfg(test)]
pub(crate) mod testutil;
