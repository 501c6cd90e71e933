fn main() {
    if let Err(err) = wgpu_terra::run() {
        eprintln!("Application error: {err}");
    }
}
