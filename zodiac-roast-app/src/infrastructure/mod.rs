pub mod clock;
pub mod db;
pub mod openai;
pub mod replicate;
pub mod security;
pub mod storage;

#[cfg(test)]
pub(crate) mod fake_vendor;
