//! Headless rendering to an image
//!
//! Generates a cloud, renders one frame into an offscreen texture, and
//! reads it back as an `RgbaImage`. Used by the CLI `render` subcommand;
//! no window or event loop is involved.

use crate::camera::OrbitCamera;
use crate::cloud::CloudRenderer;
use crate::init::init_headless;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use stardust_core::params::GenerationParameters;
use stardust_engine::Engine;

const HEADLESS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Render one frame of a generated galaxy without a window
pub fn render_image(
    params: &GenerationParameters,
    width: u32,
    height: u32,
    seed: Option<u64>,
) -> Result<image::RgbaImage> {
    let (device, queue) = pollster::block_on(init_headless())?;

    let renderer = CloudRenderer::new(device.clone(), queue.clone(), HEADLESS_FORMAT);
    let mut engine = Engine::with_parameters(renderer, params.clone());

    let background = engine.material().background;
    engine.backend_mut().set_background(background);

    match seed {
        Some(seed) => engine.regenerate_with(&mut StdRng::seed_from_u64(seed))?,
        None => engine.regenerate()?,
    }

    let mut camera = OrbitCamera::default();
    camera.aspect = width as f32 / height as f32;

    // Offscreen render target
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Headless Target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HEADLESS_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    engine.backend().update_uniforms(
        &camera,
        [width as f32, height as f32],
        engine.material(),
        0.0,
    );
    engine.backend().render(&view, engine.cloud());

    // Read back, honoring the row alignment wgpu requires for copies
    let bytes_per_pixel = 4u32;
    let unpadded_bytes_per_row = width * bytes_per_pixel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;
    let buffer_size = u64::from(padded_bytes_per_row * height);

    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Headless Readback"),
        size: buffer_size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Headless Copy Encoder"),
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &output_buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = output_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    let _ = device.poll(wgpu::PollType::Wait);
    rx.recv()??;

    let data = buffer_slice.get_mapped_range();

    // Strip the row padding while converting to an image
    let mut img = image::RgbaImage::new(width, height);
    for y in 0..height {
        let row_start = (y * padded_bytes_per_row) as usize;
        let row = &data[row_start..row_start + (width * bytes_per_pixel) as usize];
        for x in 0..width {
            let p = (x * bytes_per_pixel) as usize;
            img.put_pixel(x, y, image::Rgba([row[p], row[p + 1], row[p + 2], row[p + 3]]));
        }
    }

    drop(data);
    output_buffer.unmap();
    engine.teardown();

    Ok(img)
}
