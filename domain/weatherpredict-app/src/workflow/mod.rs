pub mod dashboard;
pub mod events;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
