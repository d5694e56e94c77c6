// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Category operations.

use crate::error::ApiError;
use crate::models::CategoryDto;
use crate::storage::{BlogDatabase, Category, CategoryRepository, Repository};

pub struct CategoryService<'a> {
    categories: CategoryRepository<'a>,
}

impl<'a> CategoryService<'a> {
    pub fn new(db: &'a BlogDatabase) -> Self {
        Self {
            categories: CategoryRepository::new(db),
        }
    }

    pub fn add(&self, dto: CategoryDto) -> Result<CategoryDto, ApiError> {
        let category = self.categories.save(Category {
            id: 0,
            name: dto.name,
            description: dto.description,
        })?;
        tracing::info!(category_id = category.id, "Category created");
        Ok(category.into())
    }

    pub fn get(&self, id: u64) -> Result<CategoryDto, ApiError> {
        self.find(id).map(CategoryDto::from)
    }

    /// All categories in id order.
    pub fn list(&self) -> Result<Vec<CategoryDto>, ApiError> {
        Ok(self
            .categories
            .find_where(|_| true)?
            .into_iter()
            .map(CategoryDto::from)
            .collect())
    }

    pub fn update(&self, id: u64, dto: CategoryDto) -> Result<CategoryDto, ApiError> {
        let mut category = self.find(id)?;
        category.name = dto.name;
        category.description = dto.description;

        let category = self.categories.save(category)?;
        tracing::info!(category_id = id, "Category updated");
        Ok(category.into())
    }

    /// Delete a category, its posts and their comments. Returns the number
    /// of rows removed across all three tables.
    pub fn delete(&self, id: u64) -> Result<usize, ApiError> {
        let removal = self.categories.delete_cascade(id)?;
        tracing::info!(
            category_id = id,
            posts = removal.posts,
            comments = removal.comments,
            "Category deleted"
        );
        Ok(removal.total())
    }

    fn find(&self, id: u64) -> Result<Category, ApiError> {
        self.categories
            .find_by_id(id)?
            .ok_or_else(|| ApiError::resource_not_found("Category", "id", id))
    }
}
