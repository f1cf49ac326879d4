fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the vendored protoc so builds do not depend on a system install
    if let Ok(path) = protoc_bin_vendored::protoc_bin_path() {
        // SAFETY: build scripts are single-threaded at this point.
        unsafe { std::env::set_var("PROTOC", path) };
    }

    // Server stubs back the in-process test server.
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile(
            &[
                "proto/speechkit/tts/v3/tts.proto",
                "proto/speechkit/tts/v3/tts_service.proto",
            ],
            &["proto"],
        )?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
