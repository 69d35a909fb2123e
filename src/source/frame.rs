//! Frame and plane types.
//!
//! A [`Frame`] is the read-only grayscale input. A [`Plane`] is the
//! zero-initialized grid that derived images are written into.

/// A single grayscale frame taken from a video sequence.
///
/// Pixels are 8-bit luma values stored row-major. The frame is never
/// mutated once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw luma samples, row-major.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Position of the frame within its source sequence.
    index: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, index: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            index,
        }
    }

    /// Builds a frame by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, index: u64, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(pixels, width, height, index)
    }

    /// Builds a frame where every pixel has the same value.
    pub fn filled(width: u32, height: u32, index: u64, value: u8) -> Self {
        Self::new(vec![value; (width as usize) * (height as usize)], width, height, index)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the sequence index.
    #[inline]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Validates that the pixel buffer size matches dimensions.
    pub fn is_valid(&self) -> bool {
        self.pixels.len() == self.pixel_count()
    }

    /// Returns row `y` as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let w = self.width as usize;
        &self.pixels[y * w..(y + 1) * w]
    }

    /// Returns the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width as usize + x]
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("index", &self.index)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

/// A row-major output grid, zero-initialized on creation.
///
/// Regions a producer never writes keep the default value, which is how
/// frame margins outside every whole block appear in derived images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

/// Motion-compensated prediction of the current frame.
pub type CompensatedFrame = Plane<u8>;

/// Signed per-pixel difference between the current frame and its prediction.
pub type ResidualImage = Plane<i16>;

/// Absolute per-pixel difference between two frames.
pub type DifferenceImage = Plane<u8>;

impl<T: Copy + Default> Plane<T> {
    /// Creates a plane with every sample set to `T::default()`.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            data: vec![T::default(); width * height],
            width,
            height,
        }
    }

    /// Creates a plane over existing row-major samples.
    ///
    /// Returns `None` if `data.len() != width * height`.
    pub fn from_vec(data: Vec<T>, width: usize, height: usize) -> Option<Self> {
        (data.len() == width * height).then_some(Self { data, width, height })
    }

    /// Plane width in samples.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height in samples.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All samples, row-major.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// All samples, row-major, mutable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns the sample at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    /// Overwrites the sample at `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * self.width + x] = value;
    }

    /// Returns row `y` as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Returns row `y` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    /// Applies `f` to every sample, producing a plane of the same size.
    pub fn map<U: Copy + Default>(&self, f: impl Fn(T) -> U) -> Plane<U> {
        Plane {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 640 * 480];
        let frame = Frame::new(pixels, 640, 480, 1);

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.index(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let frame = Frame::new(pixels, 640, 480, 1);

        assert!(!frame.is_valid());
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let frame = Frame::from_fn(4, 3, 0, |x, y| (y * 10 + x) as u8);

        assert_eq!(frame.pixel(3, 0), 3);
        assert_eq!(frame.pixel(0, 2), 20);
        assert_eq!(frame.row(1), &[10, 11, 12, 13]);
    }

    #[test]
    fn test_plane_defaults_to_zero() {
        let plane: Plane<i16> = Plane::new(5, 2);
        assert!(plane.as_slice().iter().all(|&v| v == 0));
        assert_eq!(plane.as_slice().len(), 10);
    }

    #[test]
    fn test_plane_set_and_row() {
        let mut plane: Plane<u8> = Plane::new(3, 2);
        plane.set(1, 1, 9);
        plane.row_mut(0).copy_from_slice(&[1, 2, 3]);

        assert_eq!(plane.get(1, 1), 9);
        assert_eq!(plane.row(0), &[1, 2, 3]);
        assert_eq!(plane.row(1), &[0, 9, 0]);
    }

    #[test]
    fn test_plane_from_vec_checks_length() {
        assert!(Plane::from_vec(vec![0u8; 6], 3, 2).is_some());
        assert!(Plane::from_vec(vec![0u8; 5], 3, 2).is_none());
    }
}
