//! WGSL validation ahead of pipeline creation.
//!
//! wgpu reports shader errors asynchronously through the device error handler,
//! which by default panics with little context. Running the source through naga
//! first turns a broken shader into a [`ShaderError`] carrying the compiler
//! diagnostic and the offending source, so startup can abort cleanly.

use crate::error::ShaderError;
use crate::impostor::ImpostorUniforms;

/// The impostor shader, compiled into the binary.
pub const IMPOSTOR_WGSL: &str = include_str!("shaders/impostor.wgsl");

/// Vertex entry point the impostor pipeline links against.
pub const VERTEX_ENTRY: &str = "vs";
/// Fragment entry point the impostor pipeline links against.
pub const FRAGMENT_ENTRY: &str = "fs";

/// Parses and validates a WGSL module.
pub fn validate_wgsl(label: &str, source: &str) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        label: label.to_string(),
        diagnostic: e.emit_to_string(source),
        source_text: source.to_string(),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );

    validator
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            label: label.to_string(),
            diagnostic: e.emit_to_string(source),
            source_text: source.to_string(),
        })?;

    log::debug!(
        "shader '{}' validated ({} entry points)",
        label,
        module.entry_points.len()
    );

    Ok(module)
}

/// Validates a WGSL module and checks it against the impostor pipeline.
///
/// On top of [`validate_wgsl`], the module must export [`VERTEX_ENTRY`] as a
/// vertex stage and [`FRAGMENT_ENTRY`] as a fragment stage, and declare a
/// uniform block at `@group(0) @binding(0)` no larger than [`ImpostorUniforms`].
pub fn validate_impostor_wgsl(label: &str, source: &str) -> Result<naga::Module, ShaderError> {
    let module = validate_wgsl(label, source)?;
    check_interface(&module).map_err(|diagnostic| ShaderError::Link {
        label: label.to_string(),
        diagnostic,
        source_text: source.to_string(),
    })?;
    Ok(module)
}

fn check_interface(module: &naga::Module) -> Result<(), String> {
    for (name, stage) in [
        (VERTEX_ENTRY, naga::ShaderStage::Vertex),
        (FRAGMENT_ENTRY, naga::ShaderStage::Fragment),
    ] {
        if !module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage)
        {
            return Err(format!("missing {stage:?} entry point '{name}'"));
        }
    }

    let bound = std::mem::size_of::<ImpostorUniforms>() as u32;
    match uniform_block_size(module, 0, 0)? {
        None => Err("no uniform block at @group(0) @binding(0)".to_string()),
        Some(size) if size > bound => Err(format!(
            "uniform block at @group(0) @binding(0) is {size} bytes, the pipeline binds {bound}"
        )),
        Some(_) => Ok(()),
    }
}

/// Size in bytes of the uniform global at `group`/`binding`, if the module has one.
fn uniform_block_size(
    module: &naga::Module,
    group: u32,
    binding: u32,
) -> Result<Option<u32>, String> {
    let wanted = naga::ResourceBinding { group, binding };
    let Some((_, global)) = module
        .global_variables
        .iter()
        .find(|(_, g)| g.space == naga::AddressSpace::Uniform && g.binding == Some(wanted))
    else {
        return Ok(None);
    };

    let mut layouter = naga::proc::Layouter::default();
    layouter
        .update(module.to_ctx())
        .map_err(|e| e.to_string())?;
    Ok(Some(layouter[global.ty].size))
}
