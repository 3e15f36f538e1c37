pub mod ludo;
