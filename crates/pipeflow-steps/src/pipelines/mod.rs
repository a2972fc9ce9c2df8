pub mod addition;
