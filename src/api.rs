pub mod swagger_main;
pub mod todo;
pub mod user;

#[cfg(test)]
pub(crate) mod test_util;
