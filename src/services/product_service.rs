//! 商品服务

use crate::{
    error::AppError,
    models::product::{CreateProductRequest, Product, UpdateProductRequest},
    repository::ProductStore,
};
use std::sync::Arc;
use uuid::Uuid;

pub struct ProductService {
    products: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    pub async fn create(&self, req: &CreateProductRequest) -> Result<Product, AppError> {
        let product = self.products.create(req).await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        Ok(self.products.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Product, AppError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("product"))
    }

    pub async fn update(&self, id: Uuid, req: &UpdateProductRequest) -> Result<Product, AppError> {
        let product = self
            .products
            .update(id, req)
            .await?
            .ok_or_else(|| AppError::not_found("product"))?;
        tracing::info!(product_id = %id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.products.delete(id).await? {
            return Err(AppError::not_found("product"));
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
