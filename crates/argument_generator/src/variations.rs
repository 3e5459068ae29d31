/// Lazily enumerates ordered selections of `k` distinct indices out of `0..n`,
/// in lexicographic order.
#[derive(Clone, Debug)]
pub struct Variations {
    n: usize,
    k: usize,
    current: Vec<usize>,
    used: Vec<bool>,
    started: bool,
    done: bool,
}

impl Variations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            current: Vec::with_capacity(k),
            used: vec![false; n],
            started: false,
            done: k > n,
        }
    }

    /// Number of selections the iterator yields in total.
    pub fn count_total(n: usize, k: usize) -> usize {
        if k > n {
            return 0;
        }
        (n - k + 1..=n).product()
    }

    fn fill_from(&mut self, start: usize) {
        let mut candidate = start;
        while self.current.len() < self.k {
            while self.used[candidate] {
                candidate += 1;
            }
            self.used[candidate] = true;
            self.current.push(candidate);
            candidate = 0;
        }
    }

    fn advance(&mut self) -> bool {
        while let Some(last) = self.current.pop() {
            self.used[last] = false;
            if let Some(next) = (last + 1..self.n).find(|i| !self.used[*i]) {
                self.used[next] = true;
                self.current.push(next);
                self.fill_from(0);
                return true;
            }
        }
        false
    }
}

impl Iterator for Variations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.fill_from(0);
        } else if !self.advance() {
            self.done = true;
            return None;
        }
        Some(self.current.clone())
    }
}
