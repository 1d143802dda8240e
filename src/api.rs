pub mod solutronic;
