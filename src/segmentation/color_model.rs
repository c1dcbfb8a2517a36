use super::{Label, LabelMask, Segmenter};
use crate::geometry::Rectangle;
use image::RgbImage;

/// Maximum number of Gaussian components per colour model
const COMPONENTS: usize = 5;

/// Lloyd refinement rounds when clustering samples into components
const CLUSTER_ROUNDS: usize = 4;

/// Added to every channel variance so flat regions stay finite
const VARIANCE_FLOOR: f64 = 1.0;

/// Weight of the neighbour agreement term
const GAMMA: f64 = 50.0;

/// Raster-order smoothing passes after each relabel
const SMOOTHING_SWEEPS: usize = 2;

type Color = [f64; 3];

fn squared_distance(a: &Color, b: &Color) -> f64 {
    a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum()
}

/// Single diagonal Gaussian component
#[derive(Debug, Clone)]
struct Component {
    mean: Color,
    variance: Color,
    /// `0.5 * sum(ln variance) - ln weight`
    offset: f64,
}

impl Component {
    fn cost(&self, color: &Color) -> f64 {
        let mahalanobis: f64 = (0..3)
            .map(|c| {
                let d = color[c] - self.mean[c];
                d * d / self.variance[c]
            })
            .sum();
        0.5 * mahalanobis + self.offset
    }
}

/// Colour statistics of one class (foreground or background)
#[derive(Debug, Clone)]
struct ColorModel {
    components: Vec<Component>,
}

impl ColorModel {
    /// Cluster `samples` and fit one component per non-empty cluster
    ///
    /// Returns `None` when there is nothing to fit.
    fn fit(samples: &[Color]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut centers = seed_centers(samples, COMPONENTS);
        let mut assignment = vec![0usize; samples.len()];

        for round in 0..=CLUSTER_ROUNDS {
            for (slot, sample) in assignment.iter_mut().zip(samples) {
                *slot = nearest(&centers, sample);
            }
            if round == CLUSTER_ROUNDS {
                break;
            }

            let mut sums = vec![[0.0; 3]; centers.len()];
            let mut counts = vec![0usize; centers.len()];
            for (&k, sample) in assignment.iter().zip(samples) {
                counts[k] += 1;
                for c in 0..3 {
                    sums[k][c] += sample[c];
                }
            }
            for (k, center) in centers.iter_mut().enumerate() {
                if counts[k] > 0 {
                    *center = sums[k].map(|s| s / counts[k] as f64);
                }
            }
        }

        let total = samples.len() as f64;
        let components = (0..centers.len())
            .filter_map(|k| {
                let members: Vec<&Color> = assignment
                    .iter()
                    .zip(samples)
                    .filter(|(a, _)| **a == k)
                    .map(|(_, s)| s)
                    .collect();
                if members.is_empty() {
                    return None;
                }

                let n = members.len() as f64;
                let mut mean = [0.0; 3];
                for m in &members {
                    for c in 0..3 {
                        mean[c] += m[c] / n;
                    }
                }
                let mut variance = [VARIANCE_FLOOR; 3];
                for m in &members {
                    for c in 0..3 {
                        variance[c] += (m[c] - mean[c]) * (m[c] - mean[c]) / n;
                    }
                }

                let weight = n / total;
                let offset = 0.5 * variance.iter().map(|v| v.ln()).sum::<f64>() - weight.ln();
                Some(Component {
                    mean,
                    variance,
                    offset,
                })
            })
            .collect();

        Some(Self { components })
    }

    /// Negative log-likelihood of the best matching component
    fn cost(&self, color: &Color) -> f64 {
        self.components
            .iter()
            .map(|component| component.cost(color))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Deterministic farthest-point seeding
///
/// Stops early once every sample coincides with a seed.
fn seed_centers(samples: &[Color], max: usize) -> Vec<Color> {
    let mut centers = vec![samples[0]];
    let mut nearest_distance: Vec<f64> = samples
        .iter()
        .map(|s| squared_distance(s, &samples[0]))
        .collect();

    while centers.len() < max {
        let Some((index, &farthest)) = nearest_distance
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
        else {
            break;
        };
        if farthest <= 0.0 {
            break;
        }

        let center = samples[index];
        for (distance, sample) in nearest_distance.iter_mut().zip(samples) {
            *distance = distance.min(squared_distance(sample, &center));
        }
        centers.push(center);
    }

    centers
}

fn nearest(centers: &[Color], sample: &Color) -> usize {
    centers
        .iter()
        .enumerate()
        .map(|(k, center)| (k, squared_distance(center, sample)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k)
        .unwrap_or(0)
}

/// Contrast normalisation: inverse of twice the mean squared neighbour difference
fn contrast_beta(colors: &[Color], width: usize, height: usize) -> f64 {
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for y in 0..height {
        for x in 0..width {
            let here = &colors[y * width + x];
            if x + 1 < width {
                sum += squared_distance(here, &colors[y * width + x + 1]);
                pairs += 1;
            }
            if y + 1 < height {
                sum += squared_distance(here, &colors[(y + 1) * width + x]);
                pairs += 1;
            }
        }
    }

    if sum <= f64::EPSILON {
        0.0
    } else {
        pairs as f64 / (2.0 * sum)
    }
}

/// Iterative foreground/background labeler driven by per-class colour models
///
/// Each iteration fits both models from the current labels, relabels the
/// rectangle by likelihood and then smooths the result with a
/// contrast-sensitive neighbour term. Pixels outside the rectangle keep the
/// label they arrived with.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColorModelSegmenter;

impl ColorModelSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for ColorModelSegmenter {
    fn segment(
        &self,
        image: &RgbImage,
        rect: &Rectangle,
        iterations: u32,
        labels: &mut LabelMask,
    ) {
        let _span = tracing::debug_span!("color_model_segment").entered();

        let width = image.width() as usize;
        let height = image.height() as usize;
        let colors: Vec<Color> = image
            .pixels()
            .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
            .collect();

        let x0 = rect.top_left().x.max(0) as usize;
        let y0 = rect.top_left().y.max(0) as usize;
        let x1 = (rect.bottom_right().x.max(0) as usize).min(width);
        let y1 = (rect.bottom_right().y.max(0) as usize).min(height);
        let region_width = x1.saturating_sub(x0);

        // Seed: everything inside the rectangle may be foreground
        for ((y, x), label) in labels.indexed_iter_mut() {
            if rect.contains(x as u32, y as u32) {
                *label = Label::ProbableForeground;
            }
        }

        let beta = contrast_beta(&colors, width, height);
        tracing::debug!("Contrast beta {:.3e}", beta);

        let mut unary = vec![(0.0f64, 0.0f64); region_width * y1.saturating_sub(y0)];

        for iteration in 0..iterations {
            // Fit both colour models from the current labels
            let mut foreground = Vec::new();
            let mut background = Vec::new();
            for ((y, x), label) in labels.indexed_iter() {
                let color = colors[y * width + x];
                if label.is_foreground() {
                    foreground.push(color);
                } else {
                    background.push(color);
                }
            }

            let (Some(fg_model), Some(bg_model)) =
                (ColorModel::fit(&foreground), ColorModel::fit(&background))
            else {
                tracing::debug!(
                    "Stopping after {} iterations: a colour model has no samples",
                    iteration
                );
                break;
            };

            // Relabel by likelihood alone
            for y in y0..y1 {
                for x in x0..x1 {
                    let color = &colors[y * width + x];
                    let costs = (fg_model.cost(color), bg_model.cost(color));
                    unary[(y - y0) * region_width + (x - x0)] = costs;
                    labels[[y, x]] = if costs.0 < costs.1 {
                        Label::ProbableForeground
                    } else {
                        Label::ProbableBackground
                    };
                }
            }

            // Smooth: neighbours with similar colour pull towards the same label
            for _ in 0..SMOOTHING_SWEEPS {
                for y in y0..y1 {
                    for x in x0..x1 {
                        let here = &colors[y * width + x];
                        let (mut fg_energy, mut bg_energy) =
                            unary[(y - y0) * region_width + (x - x0)];

                        let neighbours = [
                            (x.checked_sub(1), Some(y)),
                            ((x + 1 < width).then_some(x + 1), Some(y)),
                            (Some(x), y.checked_sub(1)),
                            (Some(x), (y + 1 < height).then_some(y + 1)),
                        ];
                        for (nx, ny) in neighbours {
                            let (Some(nx), Some(ny)) = (nx, ny) else {
                                continue;
                            };
                            let penalty = GAMMA
                                * (-beta * squared_distance(here, &colors[ny * width + nx])).exp();
                            if labels[[ny, nx]].is_foreground() {
                                bg_energy += penalty;
                            } else {
                                fg_energy += penalty;
                            }
                        }

                        labels[[y, x]] = if fg_energy < bg_energy {
                            Label::ProbableForeground
                        } else {
                            Label::ProbableBackground
                        };
                    }
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "color-model"
    }
}
