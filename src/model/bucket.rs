use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CategoryBucket(u32);

impl CategoryBucket {
    pub(crate) fn new(index: u32) -> Self {
        debug_assert!(index >= 1);
        Self(index)
    }

    #[cfg(test)]
    pub fn get(self) -> u32 {
        self.0
    }

    pub fn offset(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl std::fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
