use serde::{Deserialize, Serialize};

use super::Recipe;
use crate::error::{AppError, AppResult};

/// A user and the recipes they have liked
///
/// Liked recipes are held by id, in the order they were liked, without duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "UserRecord")]
pub struct User {
    user_id: i64,
    username: String,
    liked_recipes: Vec<i64>,
}

/// Unvalidated wire form of a [`User`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub liked_recipes: Option<Vec<i64>>,
}

impl User {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            liked_recipes: Vec::new(),
        }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn liked_recipe_ids(&self) -> &[i64] {
        &self.liked_recipes
    }

    pub fn has_liked(&self, recipe_id: i64) -> bool {
        self.liked_recipes.contains(&recipe_id)
    }

    /// Likes a recipe and bumps its like counter
    ///
    /// Returns `false` without touching the recipe when it was already liked.
    pub fn like_recipe(&mut self, recipe: &mut Recipe) -> bool {
        if self.has_liked(recipe.recipe_id()) {
            return false;
        }
        self.liked_recipes.push(recipe.recipe_id());
        recipe.increment_likes();
        true
    }

    /// Removes a recipe from the liked set. The recipe's like counter is left as is.
    pub fn unlike_recipe(&mut self, recipe_id: i64) -> bool {
        let before = self.liked_recipes.len();
        self.liked_recipes.retain(|id| *id != recipe_id);
        self.liked_recipes.len() != before
    }
}

impl TryFrom<UserRecord> for User {
    type Error = AppError;

    fn try_from(record: UserRecord) -> AppResult<Self> {
        let user_id = record
            .user_id
            .ok_or_else(|| AppError::InvalidInput("User id must be provided".to_string()))?;

        let mut user = User::new(user_id, record.username);
        for recipe_id in record.liked_recipes.unwrap_or_default() {
            if !user.has_liked(recipe_id) {
                user.liked_recipes.push(recipe_id);
            }
        }
        Ok(user)
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.user_id == other.user_id
    }
}

impl Eq for User {}
