pub mod execution {
    pub mod measurement;
}
