/// Column-major 4x4 matrix, laid out the way GL expects uniform data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Mat4 {
    pub(crate) data: [f32; 16],
}

impl Mat4 {
    /// Orthographic projection for the given clipping planes.
    pub(crate) fn orthographic(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut data = [0.0; 16];

        data[0] = 2.0 / (right - left);
        data[5] = 2.0 / (top - bottom);
        data[10] = -2.0 / (far - near);
        data[12] = -(right + left) / (right - left);
        data[13] = -(top + bottom) / (top - bottom);
        data[14] = -(far + near) / (far - near);
        data[15] = 1.0;

        Self { data }
    }

    /// Maps pixel coordinates to clip space with the origin in the top-left
    /// corner: x spans `[0, width]`, y spans `[height, 0]`.
    pub(crate) fn orthographic_from_size(width: f32, height: f32) -> Self {
        Self::orthographic(0.0, width, height, 0.0, -1.0, 1.0)
    }

    /// Transforms the point `(x, y, 0, 1)`, returning clip-space `(x, y)`.
    #[cfg(test)]
    fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.data;
        (m[0] * x + m[4] * y + m[12], m[1] * x + m[5] * y + m[13])
    }
}
