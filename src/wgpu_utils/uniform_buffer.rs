use super::create_mapped_buffer;

/// A uniform buffer holding a single `Content` value.
///
/// The last written value is kept on the CPU so unchanged frames skip the
/// queue write.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content: Content,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        type_name.rsplit("::").next().unwrap_or(type_name)
    }

    pub fn new_with_data(device: &wgpu::Device, content: &Content) -> Self {
        let label = format!("UniformBuffer: {}", Self::name());
        let buffer = create_mapped_buffer::<Content, std::convert::Infallible>(
            device,
            &label,
            wgpu::BufferUsages::UNIFORM,
            1,
            |range| {
                range[0] = *content;
                Ok(())
            },
        )
        .unwrap_or_else(|never| match never {});

        Self {
            buffer,
            content: *content,
        }
    }

    /// Writes `content` to the GPU unless it equals the last written value.
    /// Returns whether a write was queued.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        if !content_changed(&self.content, &content) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
        self.content = content;
        true
    }

    /// The value most recently written to the buffer.
    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource {
        self.buffer.as_entire_binding()
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Bytewise comparison, so `-0.0` and `0.0` count as different uniforms.
pub(crate) fn content_changed<Content: bytemuck::Pod>(previous: &Content, next: &Content) -> bool {
    bytemuck::bytes_of(previous) != bytemuck::bytes_of(next)
}
