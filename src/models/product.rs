//! 商品模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 商品
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(req: &CreateProductRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: req.name.clone(),
            price: req.price,
            description: req.description.clone(),
            image_url: req.image_url.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 合并部分更新，未提供的字段保持原值
    pub fn apply(&mut self, req: &UpdateProductRequest) {
        if let Some(name) = &req.name {
            self.name = name.clone();
        }
        if let Some(price) = req.price {
            self.price = price;
        }
        if let Some(description) = &req.description {
            self.description = description.clone();
        }
        if let Some(image_url) = &req.image_url {
            self.image_url = image_url.clone();
        }
        self.updated_at = Utc::now();
    }
}

/// 创建商品请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(length(min = 1, max = 1000))]
    pub description: String,

    #[validate(url)]
    pub image_url: String,
}

/// 更新商品请求（PATCH 语义）
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(range(min = 0.0))]
    pub price: Option<f64>,

    #[validate(length(min = 1, max = 1000))]
    pub description: Option<String>,

    #[validate(url)]
    pub image_url: Option<String>,
}
