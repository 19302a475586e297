// 该文件是 Wangyue （望岳） 项目的一部分。
// src/model.rs - 模型
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 模型输入张量的数值编码，在模型加载时确定一次，之后不再逐像素判定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorEncoding {
  /// 32 位浮点，像素归一化到 [-1, 1]。
  FloatNormalized,
  /// 8 位无符号，像素字节原样写入。
  QuantizedUnsigned,
}

/// 输出张量末维的原始取值，类型与模型输入编码约定一致。
#[derive(Debug, Clone)]
pub enum OutputScores {
  Float(Vec<f32>),
  Quantized(Vec<u8>),
}

impl OutputScores {
  pub fn len(&self) -> usize {
    match self {
      OutputScores::Float(values) => values.len(),
      OutputScores::Quantized(values) => values.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
  pub index: usize,
  pub probability: f32,
}

#[derive(Debug, Clone)]
pub struct ClassifyResult {
  pub items: Box<[Detection]>,
}

mod classifier;
pub use self::classifier::{Classifier, ClassifierBuilder, ClassifierError};
