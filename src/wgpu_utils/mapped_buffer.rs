//! Buffers filled through a mapping at creation time.

/// Creates a buffer of `len` elements of `T`, lets `fill` write the mapped
/// contents, then unmaps it.
///
/// The buffer is dropped without being handed out if `fill` fails.
///
/// # Examples
///
/// ```no_run
/// # fn upload(device: &wgpu::Device) -> Result<wgpu::Buffer, std::convert::Infallible> {
/// use gpu_workshop::wgpu_utils::create_mapped_buffer;
///
/// let data = [1.0f32, 2.0, 3.0];
/// create_mapped_buffer::<f32, _>(device, "Floats", wgpu::BufferUsages::VERTEX, data.len(), |range| {
///     range.copy_from_slice(&data);
///     Ok(())
/// })
/// # }
/// ```
pub fn create_mapped_buffer<T, E>(
    device: &wgpu::Device,
    label: &str,
    usage: wgpu::BufferUsages,
    len: usize,
    fill: impl FnOnce(&mut [T]) -> Result<(), E>,
) -> Result<wgpu::Buffer, E>
where
    T: bytemuck::Pod,
{
    let size = (len * std::mem::size_of::<T>()) as wgpu::BufferAddress;
    // mapped_at_creation requires a non-empty size aligned to COPY_BUFFER_ALIGNMENT
    let padded_size = size
        .next_multiple_of(wgpu::COPY_BUFFER_ALIGNMENT)
        .max(wgpu::COPY_BUFFER_ALIGNMENT);

    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: padded_size,
        usage: usage | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: true,
    });

    {
        let mut mapped = buffer.slice(..).get_mapped_range_mut();
        let elements: &mut [T] = bytemuck::cast_slice_mut(&mut mapped[..size as usize]);
        fill(elements)?;
    }
    buffer.unmap();

    log::debug!("created mapped buffer '{label}' ({padded_size} bytes)");
    Ok(buffer)
}
