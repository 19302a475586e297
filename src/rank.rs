// 该文件是 Wangyue （望岳） 项目的一部分。
// src/rank.rs - 推理结果排序
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use crate::model::{ClassifyResult, Detection, OutputScores};

/// 把输出张量转换为概率，过滤低于下限的项，按概率降序排序，
/// 并截断到 `max_results`。不足时返回全部，不补齐也不报错。
///
/// 浮点取值直接作为概率，量化取值除以 255.0。相同概率之间的顺序
/// 不作约定。
pub fn rank(scores: &OutputScores, probability_floor: f32, max_results: usize) -> ClassifyResult {
  let mut items: Vec<Detection> = match scores {
    OutputScores::Float(values) => values
      .iter()
      .enumerate()
      .map(|(index, &probability)| Detection { index, probability })
      .filter(|item| item.probability >= probability_floor)
      .collect(),
    OutputScores::Quantized(values) => values
      .iter()
      .enumerate()
      .map(|(index, &value)| Detection {
        index,
        probability: value as f32 / 255.0,
      })
      .filter(|item| item.probability >= probability_floor)
      .collect(),
  };

  items.sort_unstable_by(|a, b| b.probability.total_cmp(&a.probability));
  items.truncate(max_results);

  ClassifyResult {
    items: items.into_boxed_slice(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn float_scores_are_sorted_non_increasing() {
    let scores = OutputScores::Float(vec![0.3, 0.9, 0.1, 0.5, 0.7]);
    let result = rank(&scores, 0.0, 10);
    for pair in result.items.windows(2) {
      assert!(pair[0].probability >= pair[1].probability);
    }
    assert_eq!(result.items.len(), 5);
  }

  #[test]
  fn floor_filters_low_confidence_entries() {
    let scores = OutputScores::Float(vec![0.05, 0.2, 0.09, 0.5]);
    let result = rank(&scores, 0.1, 10);
    assert_eq!(result.items.len(), 2);
    for item in result.items.iter() {
      assert!(item.probability >= 0.1);
    }
  }

  #[test]
  fn output_is_truncated_to_max_results() {
    let scores = OutputScores::Float(vec![0.9, 0.8, 0.7, 0.6, 0.5]);
    let result = rank(&scores, 0.0, 2);
    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].index, 0);
    assert_eq!(result.items[1].index, 1);
  }

  #[test]
  fn fewer_survivors_than_requested_returns_all_of_them() {
    let scores = OutputScores::Float(vec![0.9]);
    let result = rank(&scores, 0.1, 5);
    assert_eq!(result.items.len(), 1);
  }

  #[test]
  fn quantized_scores_divide_by_255() {
    let scores = OutputScores::Quantized(vec![10, 255, 0]);
    let result = rank(&scores, 0.0, 5);
    assert_eq!(result.items[0].index, 1);
    assert_eq!(result.items[0].probability, 1.0);
    assert_eq!(result.items[1].index, 0);
    assert!((result.items[1].probability - 10.0 / 255.0).abs() < 1e-6);
    assert_eq!(result.items[2].index, 2);
    assert_eq!(result.items[2].probability, 0.0);
  }

  #[test]
  fn floor_applies_to_the_quantized_path_too() {
    let scores = OutputScores::Quantized(vec![10, 255, 0]);
    let result = rank(&scores, 0.1, 5);
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].index, 1);
  }

  #[test]
  fn empty_scores_yield_empty_result() {
    let result = rank(&OutputScores::Float(Vec::new()), 0.1, 5);
    assert!(result.items.is_empty());
  }
}
