// 该文件是 Wangyue （望岳） 项目的一部分。
// src/respond.rs - JSON 响应构建
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

use serde::Serialize;
use thiserror::Error;

use crate::{labels::LabelTable, model::ClassifyResult};

#[derive(Error, Debug)]
pub enum ResponseError {
  #[error("标签索引越界: {index} (标签总数 {len})")]
  LabelOutOfBounds { index: usize, len: usize },
  #[error("JSON 序列化失败: {0}")]
  Serialization(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Prediction<'a> {
  label: &'a str,
  probability: f32,
}

/// 把排序后的结果与标签表合成 JSON 数组字符串:
/// `[{"label": ..., "probability": ...}, ...]`。
///
/// 结果下标超出标签表范围是请求级错误，不允许越界读取。
pub fn build_json(result: &ClassifyResult, labels: &LabelTable) -> Result<String, ResponseError> {
  let mut predictions = Vec::with_capacity(result.items.len());
  for item in result.items.iter() {
    let label = labels
      .get(item.index)
      .ok_or(ResponseError::LabelOutOfBounds {
        index: item.index,
        len: labels.len(),
      })?;
    predictions.push(Prediction {
      label,
      probability: item.probability,
    });
  }

  Ok(serde_json::to_string(&predictions)?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Detection;

  fn labels() -> LabelTable {
    LabelTable::from(vec!["cat".to_owned(), "dog".to_owned(), "bird".to_owned()])
  }

  #[test]
  fn builds_a_json_array_of_label_and_probability() {
    let result = ClassifyResult {
      items: vec![
        Detection { index: 1, probability: 1.0 },
        Detection { index: 0, probability: 10.0 / 255.0 },
        Detection { index: 2, probability: 0.0 },
      ]
      .into_boxed_slice(),
    };

    let body = build_json(&result, &labels()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(parsed.as_array().unwrap().len(), 3);
    assert_eq!(parsed[0]["label"], "dog");
    assert_eq!(parsed[0]["probability"], 1.0);
    assert_eq!(parsed[1]["label"], "cat");
    assert_eq!(parsed[2]["label"], "bird");
    assert_eq!(parsed[2]["probability"], 0.0);
  }

  #[test]
  fn empty_result_is_an_empty_array() {
    let result = ClassifyResult {
      items: Vec::new().into_boxed_slice(),
    };
    assert_eq!(build_json(&result, &labels()).unwrap(), "[]");
  }

  #[test]
  fn out_of_bounds_index_is_rejected() {
    let result = ClassifyResult {
      items: vec![Detection { index: 9, probability: 0.5 }].into_boxed_slice(),
    };
    let err = build_json(&result, &labels()).unwrap_err();
    assert!(matches!(
      err,
      ResponseError::LabelOutOfBounds { index: 9, len: 3 }
    ));
  }
}
