use crate::variations::Variations;

/// Lazy cartesian product of several [`Variations`] streams.
/// The last stream varies fastest.
#[derive(Clone, Debug)]
pub struct Combinator {
    templates: Vec<Variations>,
    streams: Vec<Variations>,
    current: Vec<Vec<usize>>,
    started: bool,
    done: bool,
}

impl Combinator {
    pub fn new(templates: Vec<Variations>) -> Self {
        Self {
            streams: templates.clone(),
            templates,
            current: Vec::new(),
            started: false,
            done: false,
        }
    }

    fn start(&mut self) -> bool {
        for stream in &mut self.streams {
            match stream.next() {
                Some(first) => self.current.push(first),
                None => return false,
            }
        }
        true
    }

    fn advance(&mut self) -> bool {
        for position in (0..self.streams.len()).rev() {
            if let Some(next) = self.streams[position].next() {
                self.current[position] = next;
                return true;
            }
            let mut fresh = self.templates[position].clone();
            match fresh.next() {
                Some(first) => self.current[position] = first,
                None => return false,
            }
            self.streams[position] = fresh;
        }
        false
    }
}

impl Iterator for Combinator {
    type Item = Vec<Vec<usize>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let more = if self.started {
            self.advance()
        } else {
            self.started = true;
            self.start()
        };
        if !more {
            self.done = true;
            return None;
        }
        Some(self.current.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::Combinator;
    use crate::variations::Variations;

    #[test]
    fn product_size_is_multiplicative() {
        let combinator = Combinator::new(vec![Variations::new(3, 2), Variations::new(2, 1)]);
        assert_eq!(combinator.count(), 6 * 2);
    }

    #[test]
    fn last_stream_varies_fastest() {
        let mut combinator = Combinator::new(vec![Variations::new(2, 1), Variations::new(2, 1)]);
        assert_eq!(combinator.next(), Some(vec![vec![0], vec![0]]));
        assert_eq!(combinator.next(), Some(vec![vec![0], vec![1]]));
        assert_eq!(combinator.next(), Some(vec![vec![1], vec![0]]));
        assert_eq!(combinator.next(), Some(vec![vec![1], vec![1]]));
        assert_eq!(combinator.next(), None);
    }

    #[test]
    fn an_empty_stream_empties_the_product() {
        let combinator = Combinator::new(vec![Variations::new(3, 1), Variations::new(1, 2)]);
        assert_eq!(combinator.count(), 0);
    }

    #[test]
    fn no_streams_yield_one_empty_combination() {
        let mut combinator = Combinator::new(Vec::new());
        assert_eq!(combinator.next(), Some(Vec::new()));
        assert_eq!(combinator.next(), None);
    }
}
