fn main() {
    // Build-time config override consumed by `LockConfig::load()`.
    println!("cargo:rerun-if-env-changed=DOORLOCK_CONFIG_JSON");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
