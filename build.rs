fn main() {
    // Propagate the ESP-IDF sysenv to dependent crates when building for
    // the device. Host builds (no `espidf` feature) skip this entirely.
    espidf_sysenv();
}

#[cfg(feature = "espidf")]
fn espidf_sysenv() {
    embuild::espidf::sysenv::output();
}

#[cfg(not(feature = "espidf"))]
fn espidf_sysenv() {}
