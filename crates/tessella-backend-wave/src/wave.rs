//! Constraint-propagation solver over a grid of candidate states.
//!
//! Both model variants reduce to the same machinery: a grid where every cell
//! starts with all states possible, an adjacency table saying which states
//! may sit next to which in each of the four directions, and a loop that
//! repeatedly observes the least-decided cell and propagates the
//! consequences. A contradiction is a cell whose candidate set empties; the
//! attempt then fails and the caller may retry with a fresh seed.

use tessella_spec::Heuristic;

use crate::rng::DeterministicRng;

/// Direction deltas: left, down, right, up.
pub(crate) const DX: [i32; 4] = [-1, 0, 1, 0];
/// Direction deltas: left, down, right, up.
pub(crate) const DY: [i32; 4] = [0, 1, 0, -1];
const OPPOSITE: [usize; 4] = [2, 3, 0, 1];

/// Adjacency table: `propagator[d][t]` lists the states allowed in the
/// `d`-neighbor of a cell holding state `t`. The relation must be symmetric
/// (`t2` allowed in direction `d` of `t1` iff `t1` allowed in the opposite
/// direction of `t2`); both variant constructors guarantee this.
pub(crate) type Propagator = [Vec<Vec<u32>>; 4];

#[derive(Debug)]
pub(crate) struct Wave {
    mx: usize,
    my: usize,
    t: usize,
    n: usize,
    periodic: bool,
    heuristic: Heuristic,

    weights: Vec<f64>,
    weight_log_weights: Vec<f64>,
    sum_of_weights: f64,
    sum_of_weight_log_weights: f64,
    starting_entropy: f64,

    propagator: Propagator,
    wave: Vec<Vec<bool>>,
    compatible: Vec<Vec<[i32; 4]>>,
    sums_of_ones: Vec<i32>,
    sums_of_weights: Vec<f64>,
    sums_of_weight_log_weights: Vec<f64>,
    entropies: Vec<f64>,
    distribution: Vec<f64>,
    stack: Vec<(usize, usize)>,
    observed_so_far: usize,
    contradiction: bool,

    // (node, state) pairs banned after every clear, before the first
    // observation. Used for the overlapping ground constraint.
    init_bans: Vec<(usize, usize)>,

    observed: Vec<i32>,
    fully_observed: bool,
}

impl Wave {
    pub(crate) fn new(
        mx: usize,
        my: usize,
        n: usize,
        periodic: bool,
        heuristic: Heuristic,
        weights: Vec<f64>,
        propagator: Propagator,
    ) -> Self {
        let t = weights.len();
        let cells = mx * my;
        let weight_log_weights: Vec<f64> = weights.iter().map(|w| w * w.ln()).collect();
        let sum_of_weights: f64 = weights.iter().sum();
        let sum_of_weight_log_weights: f64 = weight_log_weights.iter().sum();
        let starting_entropy = sum_of_weights.ln() - sum_of_weight_log_weights / sum_of_weights;

        Self {
            mx,
            my,
            t,
            n,
            periodic,
            heuristic,
            weights,
            weight_log_weights,
            sum_of_weights,
            sum_of_weight_log_weights,
            starting_entropy,
            propagator,
            wave: vec![vec![true; t]; cells],
            compatible: vec![vec![[0; 4]; t]; cells],
            sums_of_ones: vec![0; cells],
            sums_of_weights: vec![0.0; cells],
            sums_of_weight_log_weights: vec![0.0; cells],
            entropies: vec![0.0; cells],
            distribution: vec![0.0; t],
            stack: Vec::new(),
            observed_so_far: 0,
            contradiction: false,
            init_bans: Vec::new(),
            observed: vec![-1; cells],
            fully_observed: false,
        }
    }

    /// Replaces the set of bans applied after every [`Wave::clear`].
    pub(crate) fn set_init_bans(&mut self, bans: Vec<(usize, usize)>) {
        self.init_bans = bans;
    }

    /// Runs one generation attempt. Returns `false` on contradiction; `true`
    /// on full observation or when the step limit is exhausted (the grid is
    /// then only partially decided).
    pub(crate) fn run(&mut self, seed: u32, limit: Option<u32>) -> bool {
        let mut rng = DeterministicRng::new(seed);
        self.clear();

        if !self.init_bans.is_empty() {
            let bans = std::mem::take(&mut self.init_bans);
            for &(node, state) in &bans {
                if self.wave[node][state] {
                    self.ban(node, state);
                }
            }
            self.init_bans = bans;
            if !self.propagate() {
                return false;
            }
        }

        let mut steps = 0u32;
        loop {
            if let Some(limit) = limit {
                if steps >= limit {
                    return true;
                }
            }
            steps += 1;

            match self.next_unobserved_node(&mut rng) {
                Some(node) => {
                    self.observe(node, &mut rng);
                    if !self.propagate() {
                        return false;
                    }
                }
                None => {
                    self.finalize_observed();
                    return true;
                }
            }
        }
    }

    /// Whether the state is still a candidate at the given node.
    pub(crate) fn allows(&self, node: usize, state: usize) -> bool {
        self.wave[node][state]
    }

    /// Whether the last run observed every cell.
    pub(crate) fn is_fully_observed(&self) -> bool {
        self.fully_observed
    }

    /// The observed state at a node. Only meaningful when
    /// [`Wave::is_fully_observed`] returns true.
    pub(crate) fn observed_at(&self, node: usize) -> usize {
        self.observed[node] as usize
    }

    /// Nodes outside the anchorable region of a non-periodic grid. Patterns
    /// anchor their top-left cell, so the last `n - 1` rows and columns carry
    /// no node of their own.
    pub(crate) fn on_boundary(&self, x: i32, y: i32) -> bool {
        !self.periodic
            && (x + self.n as i32 > self.mx as i32
                || y + self.n as i32 > self.my as i32
                || x < 0
                || y < 0)
    }

    fn clear(&mut self) {
        for i in 0..self.wave.len() {
            for t in 0..self.t {
                self.wave[i][t] = true;
                for d in 0..4 {
                    self.compatible[i][t][d] = self.propagator[OPPOSITE[d]][t].len() as i32;
                }
            }
            self.sums_of_ones[i] = self.t as i32;
            self.sums_of_weights[i] = self.sum_of_weights;
            self.sums_of_weight_log_weights[i] = self.sum_of_weight_log_weights;
            self.entropies[i] = self.starting_entropy;
            self.observed[i] = -1;
        }
        self.observed_so_far = 0;
        self.contradiction = false;
        self.fully_observed = false;
        self.stack.clear();
    }

    fn next_unobserved_node(&mut self, rng: &mut DeterministicRng) -> Option<usize> {
        if self.heuristic == Heuristic::Scanline {
            for i in self.observed_so_far..self.wave.len() {
                if self.on_boundary((i % self.mx) as i32, (i / self.mx) as i32) {
                    continue;
                }
                if self.sums_of_ones[i] > 1 {
                    self.observed_so_far = i + 1;
                    return Some(i);
                }
            }
            return None;
        }

        let mut min = f64::INFINITY;
        let mut argmin = None;
        for i in 0..self.wave.len() {
            if self.on_boundary((i % self.mx) as i32, (i / self.mx) as i32) {
                continue;
            }
            let remaining = self.sums_of_ones[i];
            if remaining <= 1 {
                continue;
            }
            let entropy = match self.heuristic {
                Heuristic::Entropy => self.entropies[i],
                _ => remaining as f64,
            };
            if entropy <= min {
                // Tiny noise breaks ties without disturbing the ordering of
                // genuinely different entropies.
                let noise = 1e-6 * rng.gen_f64();
                if entropy + noise < min {
                    min = entropy + noise;
                    argmin = Some(i);
                }
            }
        }
        argmin
    }

    fn observe(&mut self, node: usize, rng: &mut DeterministicRng) {
        for t in 0..self.t {
            self.distribution[t] = if self.wave[node][t] { self.weights[t] } else { 0.0 };
        }
        let chosen = weighted_pick(&self.distribution, rng.gen_f64());
        for t in 0..self.t {
            if self.wave[node][t] != (t == chosen) {
                self.ban(node, t);
            }
        }
    }

    fn ban(&mut self, node: usize, state: usize) {
        self.wave[node][state] = false;
        for d in 0..4 {
            self.compatible[node][state][d] = 0;
        }
        self.stack.push((node, state));

        self.sums_of_ones[node] -= 1;
        self.sums_of_weights[node] -= self.weights[state];
        self.sums_of_weight_log_weights[node] -= self.weight_log_weights[state];

        let sum = self.sums_of_weights[node];
        self.entropies[node] = if sum > 0.0 {
            sum.ln() - self.sums_of_weight_log_weights[node] / sum
        } else {
            0.0
        };

        if self.sums_of_ones[node] == 0 {
            self.contradiction = true;
        }
    }

    fn propagate(&mut self) -> bool {
        while let Some((node, state)) = self.stack.pop() {
            let x1 = (node % self.mx) as i32;
            let y1 = (node / self.mx) as i32;
            for d in 0..4 {
                let mut x2 = x1 + DX[d];
                let mut y2 = y1 + DY[d];
                if self.on_boundary(x2, y2) {
                    continue;
                }
                if x2 < 0 {
                    x2 += self.mx as i32;
                } else if x2 >= self.mx as i32 {
                    x2 -= self.mx as i32;
                }
                if y2 < 0 {
                    y2 += self.my as i32;
                } else if y2 >= self.my as i32 {
                    y2 -= self.my as i32;
                }
                let neighbor = x2 as usize + y2 as usize * self.mx;

                for k in 0..self.propagator[d][state].len() {
                    let t2 = self.propagator[d][state][k] as usize;
                    self.compatible[neighbor][t2][d] -= 1;
                    if self.compatible[neighbor][t2][d] == 0 {
                        self.ban(neighbor, t2);
                    }
                }
            }
        }
        !self.contradiction
    }

    fn finalize_observed(&mut self) {
        for i in 0..self.wave.len() {
            for t in 0..self.t {
                if self.wave[i][t] {
                    self.observed[i] = t as i32;
                    break;
                }
            }
        }
        self.fully_observed = true;
    }
}

/// Picks an index from an unnormalized weight distribution using a uniform
/// random value in [0, 1).
fn weighted_pick(distribution: &[f64], r: f64) -> usize {
    let total: f64 = distribution.iter().sum();
    let threshold = r * total;
    let mut partial = 0.0;
    let mut last_positive = 0;
    for (i, w) in distribution.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        partial += w;
        last_positive = i;
        if partial >= threshold {
            return i;
        }
    }
    // Rounding can leave the running sum a hair under the threshold; fall
    // back to the last state that carries any weight.
    last_positive
}
