fn main() {
    println!("cargo:rerun-if-changed=tauri.conf.json");
    println!("cargo:rerun-if-changed=dist");

    // The library and its tests build without a webview toolchain.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
