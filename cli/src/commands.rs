pub(crate) mod configuration;
