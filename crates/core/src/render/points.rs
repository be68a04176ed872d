//! Draws a [`Scene`] with glow: markers as opaque discs, then the galaxy as
//! additive, depth-read-only point sprites.

use crate::animation::RenderBackend;
use crate::camera::PerspectiveCamera;
use crate::error::BackdropError;
use crate::render::context::GpuContext;
use crate::render::shader::{
    compile_program, COLOR_LOCATION, POINT_FRAGMENT_SHADER, POINT_VERTEX_SHADER, POSITION_LOCATION,
};
use crate::scene::{Blending, Scene};
use glam::{Mat4, Vec3};
use glow::HasContext;

/// GPU buffers for one point cloud.
struct PointBatch {
    vao: glow::VertexArray,
    positions: glow::Buffer,
    colors: glow::Buffer,
    count: i32,
}

struct Uniforms {
    model: Option<glow::UniformLocation>,
    view: Option<glow::UniformLocation>,
    projection: Option<glow::UniformLocation>,
    size: Option<glow::UniformLocation>,
    scale: Option<glow::UniformLocation>,
    round: Option<glow::UniformLocation>,
}

/// [`RenderBackend`] over a WebGL2 (or desktop GL 3.3+) context.
pub struct PointRenderer {
    ctx: GpuContext,
    program: Option<glow::Program>,
    uniforms: Uniforms,
    field: Option<PointBatch>,
    markers: Option<PointBatch>,
    width: u32,
    height: u32,
}

/// `(src, dst)` blend factors for a material.
fn blend_factors(blending: Blending) -> (u32, u32) {
    match blending {
        Blending::Additive => (glow::SRC_ALPHA, glow::ONE),
        Blending::Normal => (glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA),
    }
}

#[allow(unsafe_code)]
fn delete_batch(gl: &glow::Context, batch: PointBatch) {
    // SAFETY: the batch owns its handles and is consumed here.
    unsafe {
        gl.delete_buffer(batch.positions);
        gl.delete_buffer(batch.colors);
        gl.delete_vertex_array(batch.vao);
    }
}

/// Uploads the field and marker clouds. Nothing is left allocated on error.
fn upload_scene(
    gl: &glow::Context,
    scene: &Scene,
) -> Result<(Option<PointBatch>, Option<PointBatch>), BackdropError> {
    let field = match scene.field() {
        Some(f) => Some(upload(gl, f.buffer().positions(), f.buffer().colors())?),
        None => None,
    };
    if scene.markers().is_empty() {
        return Ok((field, None));
    }
    let positions: Vec<Vec3> = scene.markers().iter().map(|m| m.position).collect();
    let colors: Vec<Vec3> = scene.markers().iter().map(|m| m.color.to_vec3()).collect();
    match upload(gl, &positions, &colors) {
        Ok(markers) => Ok((field, Some(markers))),
        Err(e) => {
            if let Some(batch) = field {
                delete_batch(gl, batch);
            }
            Err(e)
        }
    }
}

#[allow(unsafe_code)]
fn upload(gl: &glow::Context, positions: &[Vec3], colors: &[Vec3]) -> Result<PointBatch, BackdropError> {
    let unavailable = |e: String| BackdropError::RendererUnavailable(e);

    // SAFETY: buffers are bound before upload and the attribute layout
    // matches the tightly packed `Vec3` slices.
    unsafe {
        let vao = gl.create_vertex_array().map_err(unavailable)?;
        gl.bind_vertex_array(Some(vao));

        let attribute = |location: u32, data: &[Vec3]| -> Result<glow::Buffer, BackdropError> {
            let buffer = gl.create_buffer().map_err(unavailable)?;
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(data), glow::STATIC_DRAW);
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_f32(location, 3, glow::FLOAT, false, 0, 0);
            Ok(buffer)
        };
        let positions_buffer = attribute(POSITION_LOCATION, positions)?;
        let colors_buffer = attribute(COLOR_LOCATION, colors)?;

        gl.bind_vertex_array(None);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);

        Ok(PointBatch {
            vao,
            positions: positions_buffer,
            colors: colors_buffer,
            count: i32::try_from(positions.len()).unwrap_or(i32::MAX),
        })
    }
}

impl PointRenderer {
    /// Compiles the point program and uploads the scene's geometry. The
    /// geometry is static; only transforms change per frame.
    ///
    /// # Errors
    ///
    /// Returns [`BackdropError::RendererUnavailable`] when the shaders fail
    /// to compile or link, or when GPU buffers cannot be created. The
    /// background is then disabled rather than treated as a page failure.
    #[allow(unsafe_code)]
    pub fn new(ctx: GpuContext, scene: &Scene, width: u32, height: u32) -> Result<Self, BackdropError> {
        let gl = ctx.gl();
        let program = compile_program(gl, POINT_VERTEX_SHADER, POINT_FRAGMENT_SHADER)?;

        // SAFETY: `program` was just linked successfully.
        let uniforms = unsafe {
            Uniforms {
                model: gl.get_uniform_location(program, "u_model"),
                view: gl.get_uniform_location(program, "u_view"),
                projection: gl.get_uniform_location(program, "u_projection"),
                size: gl.get_uniform_location(program, "u_size"),
                scale: gl.get_uniform_location(program, "u_scale"),
                round: gl.get_uniform_location(program, "u_round"),
            }
        };

        let (field, markers) = match upload_scene(gl, scene) {
            Ok(batches) => batches,
            Err(e) => {
                // SAFETY: the program is unused and deleted once.
                unsafe { gl.delete_program(program) };
                return Err(e);
            }
        };

        log::debug!(
            "point renderer ready: {} field points, {} markers",
            field.as_ref().map_or(0, |b| b.count),
            markers.as_ref().map_or(0, |b| b.count)
        );

        Ok(Self {
            ctx,
            program: Some(program),
            uniforms,
            field,
            markers,
            width,
            height,
        })
    }

    #[allow(unsafe_code)]
    fn draw(&self, batch: &PointBatch, model: Mat4, size: f32, round: bool) {
        let gl = self.ctx.gl();
        // SAFETY: the batch's VAO belongs to this context and the program is
        // bound by the caller.
        unsafe {
            gl.uniform_matrix_4_f32_slice(self.uniforms.model.as_ref(), false, &model.to_cols_array());
            gl.uniform_1_f32(self.uniforms.size.as_ref(), size);
            gl.uniform_1_f32(self.uniforms.round.as_ref(), if round { 1.0 } else { 0.0 });
            gl.bind_vertex_array(Some(batch.vao));
            gl.draw_arrays(glow::POINTS, 0, batch.count);
        }
    }
}

impl RenderBackend for PointRenderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    #[allow(unsafe_code)]
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), BackdropError> {
        let Some(program) = self.program else {
            return Err(BackdropError::Render("renderer already disposed".into()));
        };
        let gl = self.ctx.gl();
        let max_size = self.ctx.max_point_size();

        // SAFETY: all handles were created on this context and are alive
        // until `dispose`.
        unsafe {
            gl.viewport(0, 0, self.width as i32, self.height as i32);
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.depth_mask(true);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            gl.enable(glow::DEPTH_TEST);

            gl.use_program(Some(program));
            gl.uniform_matrix_4_f32_slice(
                self.uniforms.view.as_ref(),
                false,
                &camera.view_matrix().to_cols_array(),
            );
            gl.uniform_matrix_4_f32_slice(
                self.uniforms.projection.as_ref(),
                false,
                &camera.projection_matrix().to_cols_array(),
            );
            gl.uniform_1_f32(self.uniforms.scale.as_ref(), self.height as f32 / 2.0);

            if let Some(batch) = &self.markers {
                gl.disable(glow::BLEND);
                let diameter = scene.markers().first().map_or(0.0, |m| m.radius * 2.0);
                self.draw(batch, Mat4::IDENTITY, diameter, true);
            }

            if let (Some(batch), Some(field)) = (&self.field, scene.field()) {
                let material = field.material();
                let (src, dst) = blend_factors(material.blending);
                gl.enable(glow::BLEND);
                gl.blend_func(src, dst);
                gl.depth_mask(material.depth_write);
                self.draw(batch, field.model_matrix(), material.size.min(max_size), false);
            }

            gl.bind_vertex_array(None);

            match gl.get_error() {
                glow::NO_ERROR => Ok(()),
                code => Err(BackdropError::Render(format!("GL error 0x{code:04x}"))),
            }
        }
    }

    #[allow(unsafe_code)]
    fn dispose(&mut self) {
        let Some(program) = self.program.take() else {
            return;
        };
        let gl = self.ctx.gl();
        for batch in [self.field.take(), self.markers.take()].into_iter().flatten() {
            delete_batch(gl, batch);
        }
        // SAFETY: `program` was taken, so later calls return early.
        unsafe { gl.delete_program(program) };
        log::debug!("point renderer disposed");
    }
}
