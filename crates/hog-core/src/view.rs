//! Column-major, explicitly strided pixel views.

/// Channel layout of a [`PixelView`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channels {
    Gray,
    /// Three color planes separated by `channel_stride` elements.
    Rgb,
}

impl Channels {
    #[inline]
    pub fn count(self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}

/// Read-only view over `f64` samples laid out column by column.
///
/// Sample `(y, x, c)` lives at `y + x * stride + c * channel_stride`. Views
/// can only be built through the checked constructors, so every sample they
/// address is inside `data`.
#[derive(Clone, Copy, Debug)]
pub struct PixelView<'a> {
    data: &'a [f64],
    height: usize,
    width: usize,
    /// Elements between consecutive columns; at least `height`.
    stride: usize,
    /// Elements between consecutive channel planes (0 for grayscale).
    channel_stride: usize,
    channels: Channels,
}

impl<'a> PixelView<'a> {
    /// Grayscale view. Returns `None` if `stride < height` or `data` does not
    /// cover every addressed sample.
    pub fn gray(data: &'a [f64], height: usize, width: usize, stride: usize) -> Option<Self> {
        Self::checked(data, height, width, stride, 0, Channels::Gray)
    }

    /// Three-plane color view. Returns `None` under the same conditions as
    /// [`PixelView::gray`].
    pub fn rgb(
        data: &'a [f64],
        height: usize,
        width: usize,
        stride: usize,
        channel_stride: usize,
    ) -> Option<Self> {
        Self::checked(data, height, width, stride, channel_stride, Channels::Rgb)
    }

    /// Densely packed column-major view (`stride == height`, planes back to back).
    pub fn from_column_major(
        data: &'a [f64],
        height: usize,
        width: usize,
        channels: Channels,
    ) -> Option<Self> {
        let channel_stride = match channels {
            Channels::Gray => 0,
            Channels::Rgb => height.checked_mul(width)?,
        };
        Self::checked(data, height, width, height, channel_stride, channels)
    }

    fn checked(
        data: &'a [f64],
        height: usize,
        width: usize,
        stride: usize,
        channel_stride: usize,
        channels: Channels,
    ) -> Option<Self> {
        if stride < height {
            return None;
        }
        if data.len() < Self::extent(height, width, stride, channel_stride, channels)? {
            return None;
        }
        Some(Self {
            data,
            height,
            width,
            stride,
            channel_stride,
            channels,
        })
    }

    /// Minimal buffer length covering every sample of a view with this
    /// layout, or `None` if it does not fit in `usize`.
    pub fn extent(
        height: usize,
        width: usize,
        stride: usize,
        channel_stride: usize,
        channels: Channels,
    ) -> Option<usize> {
        if height == 0 || width == 0 {
            return Some(0);
        }
        let last_col = (width - 1).checked_mul(stride)?;
        let last_plane = (channels.count() - 1).checked_mul(channel_stride)?;
        (height - 1)
            .checked_add(last_col)?
            .checked_add(last_plane)?
            .checked_add(1)
    }

    /// Minimal buffer length that covers every sample addressed by this view.
    pub fn required_len(&self) -> Option<usize> {
        Self::extent(self.height, self.width, self.stride, self.channel_stride, self.channels)
    }

    #[inline]
    pub fn data(&self) -> &'a [f64] {
        self.data
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn channel_stride(&self) -> usize {
        self.channel_stride
    }

    #[inline]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    #[inline]
    pub fn is_color(&self) -> bool {
        self.channels == Channels::Rgb
    }

    /// Sample at row `y`, column `x`, channel `c`.
    #[inline]
    pub fn at(&self, y: usize, x: usize, c: usize) -> f64 {
        self.data[y + x * self.stride + c * self.channel_stride]
    }
}
