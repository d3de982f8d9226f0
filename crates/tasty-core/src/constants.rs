// ABOUTME: Application constants for field limits, user-facing messages, and pagination
// ABOUTME: Shared between the policy layer, the database layer, and HTTP handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Tasty Treats Contributors

/// Field length limits enforced before anything reaches storage
pub mod limits {
    /// Maximum recipe name length in characters
    pub const RECIPE_NAME_MAX_LEN: usize = 255;
    /// Maximum ingredient name length in characters
    pub const INGREDIENT_NAME_MAX_LEN: usize = 255;
    /// Maximum measurement name length in characters
    pub const MEASUREMENT_NAME_MAX_LEN: usize = 50;
    /// Maximum ingredient quantity length in characters
    pub const QUANTITY_MAX_LEN: usize = 50;
    /// Maximum profile display name length in characters
    pub const PROFILE_NAME_MAX_LEN: usize = 255;
    /// Maximum username length in characters
    pub const USERNAME_MAX_LEN: usize = 150;
    /// Minimum password length in characters
    pub const PASSWORD_MIN_LEN: usize = 8;
}

/// Exact messages returned to clients for domain validation failures
pub mod messages {
    /// Self-follow attempt
    pub const CANNOT_FOLLOW_SELF: &str = "You cannot follow yourself.";
    /// Duplicate follow attempt
    pub const ALREADY_FOLLOWING: &str = "Already following this user.";
    /// Duplicate like attempt
    pub const ALREADY_LIKED: &str = "You have already liked this recipe.";
    /// Ingredient write against another user's recipe
    pub const NOT_RECIPE_OWNER: &str = "You cannot add ingredients to recipes you do not own.";
    /// Ownership guard denial
    pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";
    /// Anonymous write attempt
    pub const AUTH_REQUIRED: &str = "Authentication credentials were not provided.";
    /// Login failure
    pub const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials.";
    /// Duplicate username at registration
    pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
}

/// Default images served when a user has not set one
pub mod images {
    /// Placeholder recipe image
    pub const DEFAULT_RECIPE_IMAGE: &str = "images/default_recipe.jpg";
    /// Placeholder profile image
    pub const DEFAULT_PROFILE_IMAGE: &str = "images/default_profile.jpg";
}

/// Pagination defaults
pub mod pagination {
    /// Page size used when the client does not ask for one
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    /// Upper bound for client-requested page sizes
    pub const MAX_PAGE_SIZE: u32 = 100;
}
