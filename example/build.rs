use std::path::Path;

use hlsl_to_rust::{Module, OpaqueType, WriteOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let hlsl_file = "src/appearance.hlsli";
    println!("cargo:rerun-if-changed={hlsl_file}");

    // Read the header shared with the shaders.
    let hlsl_source = std::fs::read_to_string(hlsl_file)?;

    let options = WriteOptions {
        snake_case_fields: true,
        ..Default::default()
    };

    let mut module = Module::default();
    module.add_opaque_type(
        "PalDescriptorHandle",
        OpaqueType {
            rust_type: "crate::DescriptorHandle".to_string(),
            size: 8,
            alignment: 4,
        },
    )?;
    // Set by the shader compiler command line.
    module.define("ASDF", 2);
    module.define("BADF", 3);

    module
        .add_header(&hlsl_source, options)
        .inspect_err(|error| error.emit_to_stderr_with_path(&hlsl_source, hlsl_file))
        // Don't print out same error twice
        .map_err(|_| "Failed to generate HLSL structs")?;

    let out_dir = std::env::var("OUT_DIR")?;
    std::fs::write(
        Path::new(&out_dir).join("appearance.rs"),
        module.to_generated_bindings(options),
    )?;
    Ok(())
}
