pub mod engine;
pub mod error;

pub mod file {
    pub mod csv {
        pub mod error;
        pub mod settings;
        pub mod source;
    }
}
