fn main() {
    // Embed Windows resources (version info)
    #[cfg(windows)]
    {
        let mut res = winres::WindowsResource::new();
        res.set("ProductName", "Lumina");
        res.set("FileDescription", "Monitor brightness controller");
        res.set("CompanyName", "Lumina Contributors");
        res.set("OriginalFilename", "lumina.exe");
        res.set("FileVersion", env!("CARGO_PKG_VERSION"));
        res.set("ProductVersion", env!("CARGO_PKG_VERSION"));
        if let Err(e) = res.compile() {
            println!("cargo:warning=Failed to embed Windows resources: {e}");
        }
    }
}
