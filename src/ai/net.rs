//! Feed-forward predictor with online gradient training
//!
//! One hidden layer, sigmoid activations throughout, trained by plain SGD
//! against a squared-error loss. `forward` caches its activations so the
//! following `train_step` backpropagates the exact decision it scored.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One-time construction parameters for the network
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetConfig {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
    pub learning_rate: f32,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            inputs: 9,
            hidden: 16,
            outputs: 2,
            learning_rate: 0.05,
        }
    }
}

/// Trainable function approximator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    cfg: NetConfig,
    /// hidden x inputs, row-major
    w1: Vec<f32>,
    b1: Vec<f32>,
    /// outputs x hidden, row-major
    w2: Vec<f32>,
    b2: Vec<f32>,
    // Activations cached by the last forward pass
    #[serde(skip)]
    last_input: Vec<f32>,
    #[serde(skip)]
    hidden_act: Vec<f32>,
    #[serde(skip)]
    output_act: Vec<f32>,
}

#[inline]
fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

impl Network {
    pub fn new(cfg: NetConfig, rng: &mut impl Rng) -> Self {
        let mut init =
            |n: usize| (0..n).map(|_| rng.random_range(-0.5f32..0.5)).collect::<Vec<f32>>();
        Self {
            cfg,
            w1: init(cfg.hidden * cfg.inputs),
            b1: init(cfg.hidden),
            w2: init(cfg.outputs * cfg.hidden),
            b2: init(cfg.outputs),
            last_input: Vec::new(),
            hidden_act: Vec::new(),
            output_act: Vec::new(),
        }
    }

    pub fn config(&self) -> NetConfig {
        self.cfg
    }

    /// Evaluate the network, caching activations for a following train step
    pub fn forward(&mut self, input: &[f32]) -> Vec<f32> {
        debug_assert_eq!(input.len(), self.cfg.inputs);

        self.last_input = input.to_vec();
        self.hidden_act = (0..self.cfg.hidden)
            .map(|j| {
                let row = &self.w1[j * self.cfg.inputs..(j + 1) * self.cfg.inputs];
                let sum: f32 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                sigmoid(sum + self.b1[j])
            })
            .collect();
        self.output_act = (0..self.cfg.outputs)
            .map(|k| {
                let row = &self.w2[k * self.cfg.hidden..(k + 1) * self.cfg.hidden];
                let sum: f32 = row.iter().zip(&self.hidden_act).map(|(w, h)| w * h).sum();
                sigmoid(sum + self.b2[k])
            })
            .collect();
        self.output_act.clone()
    }

    /// One SGD step against the expected outputs, using the activations of
    /// the most recent `forward`. A train step without a prior forward pass
    /// has nothing to learn from and is ignored.
    pub fn train_step(&mut self, expected: &[f32]) {
        debug_assert_eq!(expected.len(), self.cfg.outputs);
        if self.output_act.is_empty() {
            return;
        }

        let lr = self.cfg.learning_rate;

        // Output layer deltas: d(loss)/d(pre-activation)
        let out_delta: Vec<f32> = self
            .output_act
            .iter()
            .zip(expected)
            .map(|(&o, &t)| (o - t) * o * (1.0 - o))
            .collect();

        // Hidden layer deltas, before w2 is updated
        let hidden_delta: Vec<f32> = (0..self.cfg.hidden)
            .map(|j| {
                let h = self.hidden_act[j];
                let back: f32 = (0..self.cfg.outputs)
                    .map(|k| out_delta[k] * self.w2[k * self.cfg.hidden + j])
                    .sum();
                back * h * (1.0 - h)
            })
            .collect();

        for k in 0..self.cfg.outputs {
            for j in 0..self.cfg.hidden {
                self.w2[k * self.cfg.hidden + j] -= lr * out_delta[k] * self.hidden_act[j];
            }
            self.b2[k] -= lr * out_delta[k];
        }
        for j in 0..self.cfg.hidden {
            for i in 0..self.cfg.inputs {
                self.w1[j * self.cfg.inputs + i] -= lr * hidden_delta[j] * self.last_input[i];
            }
            self.b1[j] -= lr * hidden_delta[j];
        }
    }
}
