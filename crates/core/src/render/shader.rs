//! Point sprite shaders and program compilation.
//!
//! One program draws both the galaxy and the markers. Point size follows
//! perspective (`size * scale / -view_z`, with `scale` half the drawing
//! buffer height). Markers set `u_round` to cut their sprites into discs.

use crate::error::BackdropError;
use thiserror::Error;

/// Attribute locations shared by the shader and the vertex array setup.
pub const POSITION_LOCATION: u32 = 0;
pub const COLOR_LOCATION: u32 = 1;

pub const POINT_VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size;
uniform float u_scale;

out vec3 v_color;

void main() {
    vec4 view_position = u_view * u_model * vec4(a_position, 1.0);
    gl_Position = u_projection * view_position;
    gl_PointSize = max(u_size * (u_scale / -view_position.z), 1.0);
    v_color = a_color;
}
"#;

pub const POINT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

uniform float u_round;

in vec3 v_color;
out vec4 frag_color;

void main() {
    if (u_round > 0.5 && length(gl_PointCoord - vec2(0.5)) > 0.5) {
        discard;
    }
    frag_color = vec4(v_color, 1.0);
}
"#;

#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    #[error("shader compile error ({stage}):\n{log}")]
    Compile { stage: &'static str, log: String },
    #[error("shader link error:\n{0}")]
    Link(String),
}

/// Shader build failures disable the background.
impl From<ShaderError> for BackdropError {
    fn from(e: ShaderError) -> Self {
        BackdropError::RendererUnavailable(e.to_string())
    }
}

/// Prefixes each source line with its right-aligned number and appends the
/// driver log, so log line references can be matched to the GLSL.
pub fn format_shader_error(source: &str, log: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines.len().max(1).to_string().len();
    let numbered = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>width$}: {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    match (numbered.is_empty(), log.is_empty()) {
        (true, _) => log.to_string(),
        (false, true) => numbered,
        (false, false) => format!("{numbered}\n\n{log}"),
    }
}

#[allow(unsafe_code)]
fn compile_stage(gl: &glow::Context, stage: u32, source: &str) -> Result<glow::Shader, ShaderError> {
    use glow::HasContext;

    let stage_name = if stage == glow::VERTEX_SHADER { "vertex" } else { "fragment" };

    // SAFETY: `stage` is a valid shader type and the handle is deleted on
    // the failure path.
    unsafe {
        let shader = gl
            .create_shader(stage)
            .map_err(|log| ShaderError::Compile { stage: stage_name, log })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);
        if gl.get_shader_compile_status(shader) {
            return Ok(shader);
        }
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        Err(ShaderError::Compile {
            stage: stage_name,
            log: format_shader_error(source, &log),
        })
    }
}

/// Compiles both stages and links them. Stage handles are always released.
#[allow(unsafe_code)]
pub fn compile_program(
    gl: &glow::Context,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<glow::Program, ShaderError> {
    use glow::HasContext;

    let vertex = compile_stage(gl, glow::VERTEX_SHADER, vertex_src)?;
    let fragment = match compile_stage(gl, glow::FRAGMENT_SHADER, fragment_src) {
        Ok(f) => f,
        Err(e) => {
            // SAFETY: `vertex` came from a successful compile.
            unsafe { gl.delete_shader(vertex) };
            return Err(e);
        }
    };

    // SAFETY: both handles are valid; the program keeps its own copies after
    // linking so the stages can be deleted either way.
    unsafe {
        let result = match gl.create_program() {
            Ok(program) => {
                gl.attach_shader(program, vertex);
                gl.attach_shader(program, fragment);
                gl.link_program(program);
                gl.detach_shader(program, vertex);
                gl.detach_shader(program, fragment);
                if gl.get_program_link_status(program) {
                    Ok(program)
                } else {
                    let log = gl.get_program_info_log(program);
                    gl.delete_program(program);
                    Err(ShaderError::Link(log))
                }
            }
            Err(log) => Err(ShaderError::Link(log)),
        };
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
        result
    }
}
