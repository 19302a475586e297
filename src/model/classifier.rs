// 该文件是 Wangyue （望岳） 项目的一部分。
// src/model/classifier.rs - 分类模型定义
//
// 本程序遵循 GNU Affero 通用公共许可证（AGPL）许可协议。
// 本程序的发布旨在提供实用价值，但不作任何形式的担保，
// 包括但不限于对适销性或特定用途适用性的默示担保。
// 更多详情请参阅 GNU 通用公共许可证。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, ETVP

use std::path::PathBuf;

use thiserror::Error;
use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::{
  codec, rank, tensor,
  model::{ClassifyResult, Model, OutputScores, TensorEncoding},
};

const DEFAULT_PROBABILITY_FLOOR: f32 = 0.1;
const DEFAULT_MAX_RESULTS: usize = 5;
const INPUT_CHANNELS: usize = 3;

#[derive(Error, Debug)]
pub enum ClassifierError {
  #[error("模型加载失败: {0}")]
  ModelLoad(TractError),
  #[error("张量分配失败: {0}")]
  TensorAllocation(TractError),
  #[error("模型输入张量不受支持: {0}")]
  UnsupportedInput(String),
  #[error("推理执行失败: {0}")]
  Invoke(TractError),
  #[error("模型输出 {0} 不存在")]
  MissingOutput(usize),
  #[error("模型输出读取失败: {0}")]
  OutputRead(TractError),
  #[error(transparent)]
  Decode(#[from] codec::DecodeError),
}

pub struct ClassifierBuilder {
  model_path: PathBuf,
  probability_floor: f32,
  max_results: usize,
}

impl ClassifierBuilder {
  pub fn new(model_path: impl Into<PathBuf>) -> Self {
    ClassifierBuilder {
      model_path: model_path.into(),
      probability_floor: DEFAULT_PROBABILITY_FLOOR,
      max_results: DEFAULT_MAX_RESULTS,
    }
  }

  /// 概率下限，低于该值的结果被过滤。浮点与量化两条路径统一生效。
  pub fn probability_floor(mut self, floor: f32) -> Self {
    self.probability_floor = floor;
    self
  }

  pub fn max_results(mut self, max_results: usize) -> Self {
    self.max_results = max_results;
    self
  }

  pub fn build(self) -> Result<Classifier, ClassifierError> {
    info!("加载模型文件: {}", self.model_path.display());
    let plan = tract_onnx::onnx()
      .model_for_path(&self.model_path)
      .map_err(ClassifierError::ModelLoad)?
      .into_optimized()
      .map_err(ClassifierError::TensorAllocation)?
      .into_runnable()
      .map_err(ClassifierError::TensorAllocation)?;
    info!("模型加载完成");

    let (shape, datum_type) = {
      let fact = plan
        .model()
        .input_fact(0)
        .map_err(ClassifierError::ModelLoad)?;
      let shape = fact
        .shape
        .as_concrete()
        .map(<[usize]>::to_vec)
        .ok_or_else(|| {
          ClassifierError::UnsupportedInput("输入张量形状必须是静态的".to_string())
        })?;
      (shape, fact.datum_type)
    };

    // 模型家族按 NHWC 排布输入: [1, 高, 宽, 通道]
    if shape.len() != 4 || shape[0] != 1 || shape[3] != INPUT_CHANNELS {
      return Err(ClassifierError::UnsupportedInput(format!(
        "预期输入形状为 [1, H, W, {}], 实际为 {:?}",
        INPUT_CHANNELS, shape
      )));
    }
    let (height, width, channels) = (shape[1], shape[2], shape[3]);
    let element_count = height * width * channels;

    let (encoding, input) = if datum_type == f32::datum_type() {
      (
        TensorEncoding::FloatNormalized,
        InputBuffer::Float(vec![0.0; element_count]),
      )
    } else if datum_type == u8::datum_type() {
      (
        TensorEncoding::QuantizedUnsigned,
        InputBuffer::Quantized(vec![0; element_count]),
      )
    } else {
      return Err(ClassifierError::UnsupportedInput(format!(
        "不支持的输入类型: {:?}",
        datum_type
      )));
    };

    debug!(
      "模型输入: {}x{}x{}, 编码: {:?}",
      height, width, channels, encoding
    );

    Ok(Classifier {
      plan,
      height,
      width,
      channels,
      encoding,
      input,
      last_output: None,
      probability_floor: self.probability_floor,
      max_results: self.max_results,
    })
  }
}

#[derive(Debug)]
enum InputBuffer {
  Float(Vec<f32>),
  Quantized(Vec<u8>),
}

/// 持有已加载模型与其输入/输出张量的执行上下文。
///
/// 输入缓冲区是无内部加锁的共享可变状态，因此全进程同一时刻最多允许
/// 一次 填充 → 推理 → 读取输出 序列在途。`classify` 以 `&mut self`
/// 表达这一约束，服务端再以互斥锁串行化所有调用。
#[derive(Debug)]
pub struct Classifier {
  plan: TypedRunnableModel<TypedModel>,
  height: usize,
  width: usize,
  channels: usize,
  encoding: TensorEncoding,
  input: InputBuffer,
  last_output: Option<TVec<Tensor>>,
  probability_floor: f32,
  max_results: usize,
}

impl Classifier {
  pub fn height(&self) -> usize {
    self.height
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn channels(&self) -> usize {
    self.channels
  }

  pub fn encoding(&self) -> TensorEncoding {
    self.encoding
  }

  fn fill(&mut self, grid: &codec::PixelGrid) {
    match &mut self.input {
      InputBuffer::Float(buffer) => tensor::fill_float(buffer, grid),
      InputBuffer::Quantized(buffer) => tensor::fill_quantized(buffer, grid),
    }
  }

  /// 以输入缓冲区当前内容执行一次前向计算。
  /// 失败是请求级错误，进程继续服务。
  pub fn invoke(&mut self) -> Result<(), ClassifierError> {
    let shape = [1, self.height, self.width, self.channels];
    let input = match &self.input {
      InputBuffer::Float(buffer) => Tensor::from_shape(&shape, buffer),
      InputBuffer::Quantized(buffer) => Tensor::from_shape(&shape, buffer),
    }
    .map_err(ClassifierError::Invoke)?;

    debug!("执行模型推理");
    let outputs = self
      .plan
      .run(tvec!(input.into()))
      .map_err(ClassifierError::Invoke)?;
    self.last_output = Some(outputs.into_iter().map(TValue::into_tensor).collect());
    Ok(())
  }

  /// 读取第 `index` 个输出张量末维的取值，类型与输入编码约定一致。
  pub fn read_output(&self, index: usize) -> Result<OutputScores, ClassifierError> {
    let outputs = self
      .last_output
      .as_ref()
      .ok_or(ClassifierError::MissingOutput(index))?;
    let output = outputs
      .get(index)
      .ok_or(ClassifierError::MissingOutput(index))?;
    let count = output.shape().last().copied().unwrap_or(0);

    match self.encoding {
      TensorEncoding::FloatNormalized => {
        let values = output
          .as_slice::<f32>()
          .map_err(ClassifierError::OutputRead)?;
        Ok(OutputScores::Float(values[values.len() - count..].to_vec()))
      }
      TensorEncoding::QuantizedUnsigned => {
        let values = output
          .as_slice::<u8>()
          .map_err(ClassifierError::OutputRead)?;
        Ok(OutputScores::Quantized(
          values[values.len() - count..].to_vec(),
        ))
      }
    }
  }

  /// 完整的请求流水线: 解码 → 填充 → 推理 → 排序。
  pub fn classify(&mut self, image: &[u8]) -> Result<ClassifyResult, ClassifierError> {
    let grid = codec::decode_and_resize(image, self.height, self.width)?;
    self.fill(&grid);
    self.invoke()?;
    let scores = self.read_output(0)?;
    self.last_output = None;
    Ok(rank::rank(&scores, self.probability_floor, self.max_results))
  }
}

impl Model for Classifier {
  type Input = Vec<u8>;
  type Output = ClassifyResult;
  type Error = ClassifierError;

  fn infer(&mut self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    self.classify(input)
  }
}
