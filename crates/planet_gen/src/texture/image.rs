//! Owned float channel images.

/// Row-major 2D image with 1 to 4 float channels per pixel.
pub struct ChannelImage {
  width: u32,
  height: u32,
  channels: u32,
  data: Vec<f32>,
}

impl ChannelImage {
  pub fn new(width: u32, height: u32, channels: u32) -> Self {
    debug_assert!((1..=4).contains(&channels));
    Self {
      width,
      height,
      channels,
      data: vec![0.0; (width * height * channels) as usize],
    }
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn channels(&self) -> u32 {
    self.channels
  }

  #[inline]
  fn offset(&self, x: u32, y: u32) -> usize {
    ((y * self.width + x) * self.channels) as usize
  }

  #[inline]
  pub fn get(&self, x: u32, y: u32) -> &[f32] {
    let o = self.offset(x, y);
    &self.data[o..o + self.channels as usize]
  }

  #[inline]
  pub fn set(&mut self, x: u32, y: u32, value: &[f32]) {
    let o = self.offset(x, y);
    self.data[o..o + self.channels as usize].copy_from_slice(value);
  }

  pub fn data(&self) -> &[f32] {
    &self.data
  }

  /// Swap rows top-to-bottom. Rasterization addresses row 0 as the
  /// bottom scanline; image files put row 0 at the top.
  pub fn flip_vertical(&mut self) {
    let row = (self.width * self.channels) as usize;
    for y in 0..(self.height / 2) as usize {
      let other = (self.height as usize - 1 - y) * row;
      for i in 0..row {
        self.data.swap(y * row + i, other + i);
      }
    }
  }

  #[inline]
  fn is_zero(&self, x: u32, y: u32) -> bool {
    self.get(x, y).iter().all(|&v| v == 0.0)
  }

  /// One hole-filling pass. A texel whose channels are all zero takes
  /// the mean of its non-zero 8-neighbors; texels with no non-zero
  /// neighbor stay zero. The all-zero sentinel also swallows texels
  /// whose material legitimately evaluated to zero.
  fn inpaint_pass(&mut self) {
    let mut next = self.data.clone();
    let mut sum = [0.0f32; 4];
    for y in 0..self.height {
      for x in 0..self.width {
        if !self.is_zero(x, y) {
          continue;
        }
        sum[..self.channels as usize].fill(0.0);
        let mut count = 0u32;
        for dy in -1i32..=1 {
          for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
              continue;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx < 0 || ny < 0 || nx >= self.width as i32 || ny >= self.height as i32 {
              continue;
            }
            let (nx, ny) = (nx as u32, ny as u32);
            if self.is_zero(nx, ny) {
              continue;
            }
            for (s, &v) in sum.iter_mut().zip(self.get(nx, ny)) {
              *s += v;
            }
            count += 1;
          }
        }
        if count > 0 {
          let o = self.offset(x, y);
          for c in 0..self.channels as usize {
            next[o + c] = sum[c] / count as f32;
          }
        }
      }
    }
    self.data = next;
  }

  /// Shrink unset regions from their border inward.
  pub fn inpaint(&mut self, passes: usize) {
    for _ in 0..passes {
      self.inpaint_pass();
    }
  }
}
