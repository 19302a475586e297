// 该文件是 Wangyue （望岳） 项目的一部分。
// src/labels.rs - 标签表
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

use std::path::Path;

/// 启动时加载一次的只读标签表，下标与模型输出位置一一对应。
///
/// 每行一个标签；空行保留为空标签，保证下标不漂移；行尾 `\r` 去除。
#[derive(Debug, Clone)]
pub struct LabelTable {
  labels: Box<[String]>,
}

impl LabelTable {
  pub fn load(path: &Path) -> std::io::Result<Self> {
    let text = std::fs::read_to_string(path)?;
    Ok(Self::parse(&text))
  }

  fn parse(text: &str) -> Self {
    let labels = text
      .lines()
      .map(|line| line.trim_end_matches('\r').to_owned())
      .collect();
    LabelTable { labels }
  }

  pub fn get(&self, index: usize) -> Option<&str> {
    self.labels.get(index).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }
}

impl From<Vec<String>> for LabelTable {
  fn from(labels: Vec<String>) -> Self {
    LabelTable {
      labels: labels.into_boxed_slice(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_lines_keep_their_index() {
    let table = LabelTable::parse("cat\n\ndog\n");
    assert_eq!(table.len(), 3);
    assert_eq!(table.get(0), Some("cat"));
    assert_eq!(table.get(1), Some(""));
    assert_eq!(table.get(2), Some("dog"));
  }

  #[test]
  fn carriage_returns_are_stripped() {
    let table = LabelTable::parse("cat\r\ndog\r\n");
    assert_eq!(table.get(0), Some("cat"));
    assert_eq!(table.get(1), Some("dog"));
  }

  #[test]
  fn out_of_bounds_lookup_is_none() {
    let table = LabelTable::parse("cat\n");
    assert_eq!(table.get(1), None);
  }
}
