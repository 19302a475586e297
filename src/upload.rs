// 该文件是 Wangyue （望岳） 项目的一部分。
// src/upload.rs - 上传装配状态机
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

use thiserror::Error;
use tracing::debug;

/// multipart 中承载图像数据的字段名。
pub const UPLOAD_FIELD: &str = "file";

#[derive(Error, Debug)]
pub enum UploadError {
  #[error("上传缓冲区分配失败: {0}")]
  BufferAllocation(#[from] std::collections::TryReserveError),
}

/// 连接内的上传状态。`Complete` 与 `Aborted` 为终态，任何终态转换
/// 都不保留缓冲区：要么移出所有权，要么就地丢弃。
#[derive(Debug, Default)]
pub enum UploadState {
  #[default]
  Idle,
  Receiving(Vec<u8>),
  Complete,
  Aborted,
}

/// 按连接装配一次 multipart 文件上传。
///
/// 对数据块的大小与边界不作任何假设：逐字节喂入与整块喂入产生
/// 完全相同的缓冲区。
#[derive(Debug, Default)]
pub struct UploadAssembler {
  state: UploadState,
}

impl UploadAssembler {
  pub fn new() -> Self {
    UploadAssembler::default()
  }

  pub fn state(&self) -> &UploadState {
    &self.state
  }

  /// 一个 multipart 部件开始。只有字段名匹配 [`UPLOAD_FIELD`] 才分配
  /// 缓冲区并进入接收状态；其余字段不分配任何状态。
  /// 返回该部件是否会被接收。
  pub fn part_begin(&mut self, field_name: &str) -> bool {
    if field_name != UPLOAD_FIELD {
      return false;
    }
    if matches!(self.state, UploadState::Idle) {
      self.state = UploadState::Receiving(Vec::new());
    }
    matches!(self.state, UploadState::Receiving(_))
  }

  /// 追加一个数据块。接收状态之外的数据块被静默忽略。
  /// 分配失败转入 `Aborted` 并释放已有的部分缓冲区。
  pub fn push_chunk(&mut self, chunk: &[u8]) -> Result<(), UploadError> {
    let UploadState::Receiving(buffer) = &mut self.state else {
      return Ok(());
    };

    if let Err(err) = buffer.try_reserve(chunk.len()) {
      debug!("上传缓冲区扩容失败, 放弃本次上传");
      self.state = UploadState::Aborted;
      return Err(err.into());
    }
    buffer.extend_from_slice(chunk);
    Ok(())
  }

  /// 部件结束：移出累积的字节并进入 `Complete`。
  /// 未处于接收状态时返回 `None`，状态保持不变。
  pub fn part_end(&mut self) -> Option<Vec<u8>> {
    match std::mem::take(&mut self.state) {
      UploadState::Receiving(buffer) => {
        debug!("上传接收完成, 共 {} 字节", buffer.len());
        self.state = UploadState::Complete;
        Some(buffer)
      }
      other => {
        self.state = other;
        None
      }
    }
  }

  /// 无条件转入 `Aborted` 并丢弃任何部分缓冲区。
  pub fn abort(&mut self) {
    self.state = UploadState::Aborted;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_chunk_and_byte_at_a_time_accumulate_identically() {
    let payload: Vec<u8> = (0..=255u8).cycle().take(1024).collect();

    let mut whole = UploadAssembler::new();
    assert!(whole.part_begin(UPLOAD_FIELD));
    whole.push_chunk(&payload).unwrap();
    let whole_buffer = whole.part_end().unwrap();

    let mut tiny = UploadAssembler::new();
    assert!(tiny.part_begin(UPLOAD_FIELD));
    for byte in &payload {
      tiny.push_chunk(std::slice::from_ref(byte)).unwrap();
    }
    let tiny_buffer = tiny.part_end().unwrap();

    assert_eq!(whole_buffer, tiny_buffer);
    assert_eq!(whole_buffer, payload);
  }

  #[test]
  fn non_matching_field_allocates_no_state() {
    let mut assembler = UploadAssembler::new();
    assert!(!assembler.part_begin("avatar"));
    assembler.push_chunk(b"ignored").unwrap();
    assert!(assembler.part_end().is_none());
    assert!(matches!(assembler.state(), UploadState::Idle));
  }

  #[test]
  fn part_end_without_begin_yields_nothing() {
    let mut assembler = UploadAssembler::new();
    assert!(assembler.part_end().is_none());
  }

  #[test]
  fn empty_part_completes_with_empty_buffer() {
    let mut assembler = UploadAssembler::new();
    assert!(assembler.part_begin(UPLOAD_FIELD));
    let buffer = assembler.part_end().unwrap();
    assert!(buffer.is_empty());
    assert!(matches!(assembler.state(), UploadState::Complete));
  }

  #[test]
  fn abort_drops_partial_buffer() {
    let mut assembler = UploadAssembler::new();
    assert!(assembler.part_begin(UPLOAD_FIELD));
    assembler.push_chunk(b"partial").unwrap();
    assembler.abort();
    assert!(matches!(assembler.state(), UploadState::Aborted));
    assert!(assembler.part_end().is_none());
  }

  #[test]
  fn repeated_part_begin_keeps_accumulated_bytes() {
    let mut assembler = UploadAssembler::new();
    assert!(assembler.part_begin(UPLOAD_FIELD));
    assembler.push_chunk(b"abc").unwrap();
    assert!(assembler.part_begin(UPLOAD_FIELD));
    assembler.push_chunk(b"def").unwrap();
    assert_eq!(assembler.part_end().unwrap(), b"abcdef");
  }
}
