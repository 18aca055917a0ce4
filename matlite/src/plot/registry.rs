use crate::error::MatliteError;
use crate::plot::Figure;
use crate::MatliteResult;
use std::collections::BTreeMap;

/// The figures of one run, keyed by id
///
/// Owned by the run that draws into it, so nothing is shared between runs. Iteration is in
/// ascending id order.
#[derive(Debug, Clone)]
pub struct FigureRegistry {
    figures: BTreeMap<u32, Figure>,
    current: Option<u32>,
    max_figures: usize,
}

impl FigureRegistry {
    pub fn new(max_figures: usize) -> Self {
        Self {
            figures: BTreeMap::new(),
            current: None,
            max_figures,
        }
    }

    /// Make figure `id` current, creating it if needed
    pub fn select(&mut self, id: u32) -> MatliteResult<&mut Figure> {
        if !self.figures.contains_key(&id) && self.figures.len() >= self.max_figures {
            return Err(MatliteError::ResourceLimitExceeded {
                limit_name: "max_figures".to_string(),
                limit_value: self.max_figures.to_string(),
                actual_value: (self.figures.len() + 1).to_string(),
                suggestion: "Reuse figure numbers instead of opening new figures.".to_string(),
            });
        }
        self.current = Some(id);
        Ok(self.figures.entry(id).or_insert_with(|| Figure::new(id)))
    }

    /// The current figure. With no figure open, the next free id is created.
    pub fn current_figure(&mut self) -> MatliteResult<&mut Figure> {
        let id = match self.current {
            Some(id) if self.figures.contains_key(&id) => id,
            _ => self
                .figures
                .keys()
                .next_back()
                .map_or(1, |last| last.saturating_add(1)),
        };
        self.select(id)
    }

    pub fn get(&self, id: u32) -> Option<&Figure> {
        self.figures.get(&id)
    }

    pub fn figures(&self) -> impl Iterator<Item = &Figure> {
        self.figures.values()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.figures.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }

    pub fn close_all(&mut self) {
        self.figures.clear();
        self.current = None;
    }
}
