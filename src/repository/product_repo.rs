//! Product repository

use crate::models::product::{CreateProductRequest, Product, UpdateProductRequest};
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::StoreError;

/// 商品存储
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create(&self, req: &CreateProductRequest) -> Result<Product, StoreError>;

    /// 按创建时间升序列出
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// 部分更新；记录不存在时返回 None
    async fn update(
        &self,
        id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<Option<Product>, StoreError>;

    /// 删除；记录不存在时返回 false
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// PostgreSQL 实现
pub struct ProductRepository {
    db: PgPool,
}

impl ProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn create(&self, req: &CreateProductRequest) -> Result<Product, StoreError> {
        let product = Product::new(req);

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, price, description, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.description)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.db)
                .await?;

        Ok(products)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(product)
    }

    async fn update(
        &self,
        id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.name)
        .bind(req.price)
        .bind(&req.description)
        .bind(&req.image_url)
        .fetch_optional(&self.db)
        .await?;

        Ok(product)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// 内存实现，保持插入顺序
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductRepository {
    async fn create(&self, req: &CreateProductRequest) -> Result<Product, StoreError> {
        let product = Product::new(req);
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn update(
        &self,
        id: Uuid,
        req: &UpdateProductRequest,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            product.apply(req);
            product.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            price: 9.5,
            description: "desc".to_string(),
            image_url: "https://example.com/p.png".to_string(),
        }
    }

    #[tokio::test]
    async fn test_in_memory_crud() {
        let repo = InMemoryProductRepository::new();

        let first = repo.create(&request("first")).await.unwrap();
        let second = repo.create(&request("second")).await.unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert_eq!(listed[1].id, second.id);

        let updated = repo
            .update(
                first.id,
                &UpdateProductRequest {
                    name: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.price, 9.5);

        assert!(repo.delete(first.id).await.unwrap());
        assert!(!repo.delete(first.id).await.unwrap());
        assert!(repo.find_by_id(first.id).await.unwrap().is_none());
        assert!(repo.find_by_id(second.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_in_memory_update_missing() {
        let repo = InMemoryProductRepository::new();
        let result = repo
            .update(Uuid::new_v4(), &UpdateProductRequest::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
