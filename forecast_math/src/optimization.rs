//! Derivative-free minimisation used to pick smoothing and ARIMA coefficients

/// Outcome of a minimisation run
#[derive(Debug, Clone)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the simplex collapsed below the tolerance
    pub converged: bool,
}

/// Nelder-Mead simplex minimiser with box constraints
#[derive(Debug, Clone, Copy)]
pub struct NelderMead {
    max_iterations: usize,
    tolerance: f64,
    initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

impl NelderMead {
    // Standard reflection, expansion, contraction and shrink coefficients
    const REFLECT: f64 = 1.0;
    const EXPAND: f64 = 2.0;
    const CONTRACT: f64 = 0.5;
    const SHRINK: f64 = 0.5;

    /// Create a minimiser with a custom iteration budget and tolerance
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            ..Self::default()
        }
    }

    /// Minimise `objective` starting from `initial`, clamping every vertex into `bounds`.
    ///
    /// `bounds` must have one `(min, max)` pair per dimension.
    pub fn minimize<F>(&self, objective: F, initial: &[f64], bounds: &[(f64, f64)]) -> Minimum
    where
        F: Fn(&[f64]) -> f64,
    {
        let dims = initial.len();
        if dims == 0 {
            return Minimum {
                point: Vec::new(),
                value: f64::NAN,
                iterations: 0,
                converged: false,
            };
        }

        let clamp = |point: Vec<f64>| -> Vec<f64> {
            point
                .into_iter()
                .enumerate()
                .map(|(i, x)| match bounds.get(i) {
                    Some(&(lo, hi)) => x.clamp(lo, hi),
                    None => x,
                })
                .collect()
        };
        // NaN objectives sort last
        let evaluate = |point: &[f64]| -> f64 {
            let value = objective(point);
            if value.is_finite() {
                value
            } else {
                f64::MAX
            }
        };

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dims + 1);
        simplex.push(clamp(initial.to_vec()));
        for i in 0..dims {
            let mut vertex = initial.to_vec();
            let step = if initial[i].abs() > 1e-10 {
                self.initial_step * initial[i].abs()
            } else {
                self.initial_step
            };
            vertex[i] += step;
            simplex.push(clamp(vertex));
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| evaluate(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;

            let mut order: Vec<usize> = (0..=dims).collect();
            order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
            let best = order[0];
            let worst = order[dims];
            let second_worst = order[dims - 1];

            if (values[worst] - values[best]).abs() < self.tolerance {
                converged = true;
                break;
            }

            let centroid = centroid(&simplex, worst);
            let spread = simplex
                .iter()
                .map(|v| distance(v, &centroid))
                .fold(0.0, f64::max);
            if spread < self.tolerance {
                converged = true;
                break;
            }

            let reflected = clamp(towards(&centroid, &simplex[worst], -Self::REFLECT));
            let reflected_value = evaluate(&reflected);

            if reflected_value < values[best] {
                let expanded = clamp(towards(&centroid, &reflected, Self::EXPAND));
                let expanded_value = evaluate(&expanded);
                if expanded_value < reflected_value {
                    simplex[worst] = expanded;
                    values[worst] = expanded_value;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = reflected_value;
                }
                continue;
            }

            if reflected_value < values[second_worst] {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
                continue;
            }

            // Contract towards whichever of the reflected/worst points is better
            let (anchor, anchor_value) = if reflected_value < values[worst] {
                (reflected, reflected_value)
            } else {
                (simplex[worst].clone(), values[worst])
            };
            let contracted = clamp(towards(&centroid, &anchor, Self::CONTRACT));
            let contracted_value = evaluate(&contracted);
            if contracted_value < anchor_value {
                simplex[worst] = contracted;
                values[worst] = contracted_value;
                continue;
            }

            let best_vertex = simplex[best].clone();
            for i in 0..=dims {
                if i == best {
                    continue;
                }
                simplex[i] = clamp(towards(&best_vertex, &simplex[i], Self::SHRINK));
                values[i] = evaluate(&simplex[i]);
            }
        }

        let best = (0..=dims)
            .min_by(|&a, &b| values[a].total_cmp(&values[b]))
            .unwrap_or(0);

        Minimum {
            point: simplex[best].clone(),
            value: values[best],
            iterations,
            converged,
        }
    }
}

/// Centroid of all vertices except `exclude`
fn centroid(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dims = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut center = vec![0.0; dims];

    for (i, vertex) in simplex.iter().enumerate() {
        if i == exclude {
            continue;
        }
        for (c, x) in center.iter_mut().zip(vertex) {
            *c += x;
        }
    }

    center.iter_mut().for_each(|c| *c /= count);
    center
}

/// `origin + factor * (point - origin)`
fn towards(origin: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + factor * (p - o))
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
