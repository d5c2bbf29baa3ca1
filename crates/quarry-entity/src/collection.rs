//! Ordered entity collection

#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
	items: Vec<T>,
}

impl<T> Collection<T> {
	pub fn new() -> Self {
		Self { items: Vec::new() }
	}

	pub fn first(&self) -> Option<&T> {
		self.items.first()
	}

	pub fn last(&self) -> Option<&T> {
		self.items.last()
	}

	pub fn count(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	pub fn into_inner(self) -> Vec<T> {
		self.items
	}
}

impl<T> Default for Collection<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> From<Vec<T>> for Collection<T> {
	fn from(items: Vec<T>) -> Self {
		Self { items }
	}
}

impl<T> IntoIterator for Collection<T> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.into_iter()
	}
}

impl<'a, T> IntoIterator for &'a Collection<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.items.iter()
	}
}

impl<T> FromIterator<T> for Collection<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self {
			items: iter.into_iter().collect(),
		}
	}
}
