// 该文件是 Wangyue （望岳） 项目的一部分。
// src/codec.rs - 图像解码与缩放
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::io::Cursor;

use image::{ImageReader, imageops::FilterType};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DecodeError {
  #[error("empty image payload")]
  EmptyInput,
  #[error("I/O error: {0}")]
  IoError(std::io::Error),
  #[error("Image loading error: {0}")]
  ImageLoadError(image::ImageError),
}

impl From<std::io::Error> for DecodeError {
  fn from(err: std::io::Error) -> Self {
    DecodeError::IoError(err)
  }
}

impl From<image::ImageError> for DecodeError {
  fn from(err: image::ImageError) -> Self {
    DecodeError::ImageLoadError(err)
  }
}

/// 行主序 HWC 排列的 RGB 像素网格，仅在一次请求内存活。
#[derive(Debug, Clone)]
pub struct PixelGrid {
  data: Box<[u8]>,
  height: usize,
  width: usize,
  channels: usize,
}

impl PixelGrid {
  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn channels(&self) -> usize {
    self.channels
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  #[inline]
  pub fn value(&self, y: usize, x: usize, c: usize) -> u8 {
    self.data[(y * self.width + x) * self.channels + c]
  }
}

/// 解码任意受支持格式的图像字节，并缩放到模型的输入尺寸。
///
/// 缩放使用三次插值（CatmullRom），输出尺寸严格等于
/// `target_height` × `target_width`。
pub fn decode_and_resize(
  bytes: &[u8],
  target_height: usize,
  target_width: usize,
) -> Result<PixelGrid, DecodeError> {
  if bytes.is_empty() {
    return Err(DecodeError::EmptyInput);
  }

  let image = ImageReader::new(Cursor::new(bytes))
    .with_guessed_format()?
    .decode()?;
  debug!("解码图像: {}x{}", image.width(), image.height());

  let resized = image.resize_exact(
    target_width as u32,
    target_height as u32,
    FilterType::CatmullRom,
  );
  let rgb = resized.to_rgb8();

  Ok(PixelGrid {
    data: rgb.into_raw().into_boxed_slice(),
    height: target_height,
    width: target_width,
    channels: 3,
  })
}
