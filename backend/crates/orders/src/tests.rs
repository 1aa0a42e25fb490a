//! Unit tests for the orders crate

#[cfg(test)]
mod fixtures {
    use std::sync::{Arc, OnceLock};

    use auth::domain::{Email, UserName};
    use auth::{Identity, InMemoryUserRepository, User, UserRepository, UserRole, UserStatus};
    use catalog::domain::ProductDetails;
    use catalog::{Category, InMemoryProductRepository, Product, ProductRepository, StockBySize};
    use kernel::id::UserId;
    use platform::password::{ClearTextPassword, HashedPassword};
    use rust_decimal::Decimal;

    use crate::application::OrderConfig;
    use crate::infra::memory::InMemoryOrderRepository;

    pub struct World {
        pub users: Arc<InMemoryUserRepository>,
        pub products: Arc<InMemoryProductRepository>,
        pub orders: Arc<InMemoryOrderRepository>,
        pub config: Arc<OrderConfig>,
    }

    pub fn world() -> World {
        let products = InMemoryProductRepository::new();
        World {
            users: Arc::new(InMemoryUserRepository::new()),
            orders: Arc::new(InMemoryOrderRepository::new(products.clone())),
            products: Arc::new(products),
            config: Arc::new(OrderConfig::default()),
        }
    }

    fn shared_hash() -> HashedPassword {
        static HASH: OnceLock<HashedPassword> = OnceLock::new();
        HASH.get_or_init(|| {
            ClearTextPassword::new("Sup3r-Secret!".to_string())
                .unwrap()
                .hash(None)
                .unwrap()
        })
        .clone()
    }

    impl World {
        pub async fn user(&self, email: &str, role: UserRole) -> User {
            let mut user = User::new(
                UserName::new("Tester").unwrap(),
                Email::new(email).unwrap(),
                shared_hash(),
                role,
            );
            user.set_status(UserStatus::Active);
            self.users.create(&user).await.unwrap();
            user
        }

        pub async fn product(&self, provider: UserId, stock: &[(&str, i64)]) -> Product {
            self.product_in(Category::Shirts, provider, stock).await
        }

        pub async fn product_in(
            &self,
            category: Category,
            provider: UserId,
            stock: &[(&str, i64)],
        ) -> Product {
            let details =
                ProductDetails::new("Tee", "Cotton tee", Decimal::new(1000, 2), "https://img/tee.png")
                    .unwrap();
            let stock = StockBySize::new(
                category,
                stock.iter().map(|(s, n)| (s.to_string(), *n)).collect(),
            )
            .unwrap();
            let product = Product::new(provider, details, category, stock);
            self.products.create(&product).await.unwrap();
            product
        }

        pub async fn stock_of(&self, product: &Product, size: &str) -> Option<u32> {
            self.products
                .find_by_id(&product.product_id)
                .await
                .unwrap()
                .and_then(|p| p.stock.get(size))
        }
    }

    pub fn identity(user: &User) -> Identity {
        Identity::new(user.user_id, user.role)
    }
}

#[cfg(test)]
mod error_tests {
    use crate::domain::status::OrderStatus;
    use crate::error::OrderError;
    use axum::http::StatusCode;
    use catalog::{CatalogError, StockError};

    #[test]
    fn test_status_codes() {
        assert_eq!(
            OrderError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OrderError::Stock(StockError::Empty).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OrderError::AlreadyFinal(OrderStatus::Completed).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(OrderError::OrderNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(OrderError::NotRelated.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            OrderError::RoleDenied("providers").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            OrderError::from(CatalogError::ProductNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_final_message() {
        assert_eq!(
            OrderError::AlreadyFinal(OrderStatus::Cancelled).to_string(),
            "Order is already cancelled"
        );
    }
}

#[cfg(test)]
mod use_case_tests {
    use auth::UserRole;
    use catalog::ProductRepository;
    use chrono::Duration;
    use rust_decimal::Decimal;

    use super::fixtures::{identity, world};
    use crate::application::*;
    use crate::domain::repository::OrderRepository;
    use crate::domain::status::OrderStatus;
    use crate::error::OrderError;

    fn item(product: &catalog::Product, size: &str, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: Some(product.product_id.to_string()),
            size: Some(size.into()),
            quantity: Some(quantity),
        }
    }

    #[tokio::test]
    async fn test_create_order_takes_provider_from_catalog() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5)]).await;

        let order = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone())
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&tee, "M", 2)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id, client.user_id);
        assert_eq!(order.lines[0].provider_id, provider.user_id);
        assert_eq!(order.total_amount, Decimal::new(2000, 2));
        assert_eq!(order.estimated_delivery - order.created_at, Duration::days(7));
        assert_eq!(w.stock_of(&tee, "M").await, Some(5));
    }

    #[tokio::test]
    async fn test_create_order_validation() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5)]).await;
        let use_case = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone());
        let who = identity(&client);

        let cases = vec![
            vec![],
            vec![OrderItemInput {
                size: None,
                ..item(&tee, "M", 1)
            }],
            vec![item(&tee, "M", 0)],
            vec![item(&tee, "M", -3)],
            vec![OrderItemInput {
                product_id: Some("not-an-id".into()),
                ..item(&tee, "M", 1)
            }],
            vec![OrderItemInput {
                product_id: Some(kernel::id::ProductId::new().to_string()),
                ..item(&tee, "M", 1)
            }],
        ];

        for items in cases {
            let result = use_case
                .execute(
                    &who,
                    CreateOrderInput {
                        items,
                        total_amount: Some(Decimal::ONE),
                    },
                )
                .await;
            assert!(matches!(result, Err(OrderError::Validation(_))));
        }

        let oversized = use_case
            .execute(
                &who,
                CreateOrderInput {
                    items: vec![item(&tee, "M", 1)],
                    total_amount: Some(Decimal::from(10_000_000_000_i64)),
                },
            )
            .await;
        assert!(matches!(oversized, Err(OrderError::Validation(_))));

        assert!(w.orders.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_checks_in_order() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let stranger = w.user("stranger@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5)]).await;
        let order = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone())
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&tee, "M", 1)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();
        let id = order.order_id.to_string();
        let set = SetOrderStatusUseCase::new(w.orders.clone());

        assert!(matches!(
            set.execute(&identity(&client), &id, Some("completed")).await,
            Err(OrderError::RoleDenied(_))
        ));
        assert!(matches!(
            set.execute(&identity(&provider), &id, Some("shipped")).await,
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            set.execute(&identity(&provider), &id, Some("cancelled")).await,
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            set.execute(&identity(&provider), &id, None).await,
            Err(OrderError::Validation(_))
        ));
        assert!(matches!(
            set.execute(
                &identity(&provider),
                &kernel::id::OrderId::new().to_string(),
                Some("in-progress")
            )
            .await,
            Err(OrderError::OrderNotFound)
        ));
        assert!(matches!(
            set.execute(&identity(&stranger), &id, Some("in-progress")).await,
            Err(OrderError::NotRelated)
        ));

        let updated = set
            .execute(&identity(&provider), &id, Some("in-progress"))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::InProgress);
        assert_eq!(w.stock_of(&tee, "M").await, Some(5));
    }

    #[tokio::test]
    async fn test_completion_decrements_once() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let admin = w.user("admin@example.com", UserRole::Administrator).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5), ("L", 2)]).await;
        let order = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone())
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&tee, "M", 2), item(&tee, "L", 1), item(&tee, "M", 1)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();
        let id = order.order_id.to_string();
        let set = SetOrderStatusUseCase::new(w.orders.clone());

        let done = set
            .execute(&identity(&admin), &id, Some("completed"))
            .await
            .unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));
        assert_eq!(w.stock_of(&tee, "L").await, Some(1));

        assert!(matches!(
            set.execute(&identity(&admin), &id, Some("completed")).await,
            Err(OrderError::AlreadyFinal(OrderStatus::Completed))
        ));
        assert!(matches!(
            set.execute(&identity(&admin), &id, Some("pending")).await,
            Err(OrderError::AlreadyFinal(OrderStatus::Completed))
        ));
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));
    }

    #[tokio::test]
    async fn test_second_order_cannot_oversell() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5)]).await;
        let create = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone());
        let set = SetOrderStatusUseCase::new(w.orders.clone());

        let mut ids = Vec::new();
        for _ in 0..2 {
            let order = create
                .execute(
                    &identity(&client),
                    CreateOrderInput {
                        items: vec![item(&tee, "M", 3)],
                        total_amount: None,
                    },
                )
                .await
                .unwrap();
            ids.push(order.order_id.to_string());
        }

        set.execute(&identity(&provider), &ids[0], Some("completed"))
            .await
            .unwrap();
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));

        let err = set
            .execute(&identity(&provider), &ids[1], Some("completed"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Stock(_)));
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));

        let second = w
            .orders
            .find_by_id(&ids[1].parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_failing_line_leaves_all_stock() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let plenty = w.product(provider.user_id, &[("M", 10)]).await;
        let scarce = w.product(provider.user_id, &[("S", 1)]).await;
        let order = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone())
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&plenty, "M", 4), item(&scarce, "S", 2)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();

        let err = SetOrderStatusUseCase::new(w.orders.clone())
            .execute(&identity(&provider), &order.order_id.to_string(), Some("completed"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Stock(_)));
        assert_eq!(w.stock_of(&plenty, "M").await, Some(10));
        assert_eq!(w.stock_of(&scarce, "S").await, Some(1));
    }

    #[tokio::test]
    async fn test_completion_with_deleted_product_or_size() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 10)]).await;
        let create = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone());
        let set = SetOrderStatusUseCase::new(w.orders.clone());

        let unknown_size = create
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&tee, "XL", 1)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();
        assert!(matches!(
            set.execute(&identity(&provider), &unknown_size.order_id.to_string(), Some("completed"))
                .await,
            Err(OrderError::Stock(_))
        ));

        let order = create
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&tee, "M", 1)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();
        w.products.delete(&tee.product_id).await.unwrap();
        assert!(matches!(
            set.execute(&identity(&provider), &order.order_id.to_string(), Some("completed"))
                .await,
            Err(OrderError::Stock(catalog::StockError::ProductMissing(_)))
        ));
    }

    #[tokio::test]
    async fn test_product_edit_after_completion_keeps_decrement() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5)]).await;
        let order = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone())
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&tee, "M", 3)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();

        let before = w.products.find_by_id(&tee.product_id).await.unwrap().unwrap();
        SetOrderStatusUseCase::new(w.orders.clone())
            .execute(&identity(&provider), &order.order_id.to_string(), Some("completed"))
            .await
            .unwrap();
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));

        let renamed = catalog::application::UpdateProductUseCase::new(w.products.clone())
            .execute(
                &identity(&provider),
                before.product_id,
                catalog::application::UpdateProductInput {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(before.stock.get("M"), Some(5));
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.stock.get("M"), Some(2));
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));
    }

    #[tokio::test]
    async fn test_legacy_cap_label_reaches_stock() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let cap = w
            .product_in(catalog::Category::Caps, provider.user_id, &[("Adjustable", 4)])
            .await;
        let order = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone())
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&cap, "Ajustable", 1)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(order.lines[0].size, "Adjustable");

        SetOrderStatusUseCase::new(w.orders.clone())
            .execute(&identity(&provider), &order.order_id.to_string(), Some("completed"))
            .await
            .unwrap();
        assert_eq!(w.stock_of(&cap, "Adjustable").await, Some(3));
    }

    #[tokio::test]
    async fn test_concurrent_completions_share_stock() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5)]).await;
        let create = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone());

        let mut ids = Vec::new();
        for _ in 0..2 {
            let order = create
                .execute(
                    &identity(&client),
                    CreateOrderInput {
                        items: vec![item(&tee, "M", 3)],
                        total_amount: None,
                    },
                )
                .await
                .unwrap();
            ids.push(order.order_id.to_string());
        }

        let who = identity(&provider);
        let first = SetOrderStatusUseCase::new(w.orders.clone());
        let second = SetOrderStatusUseCase::new(w.orders.clone());
        let (a, b) = tokio::join!(
            first.execute(&who, &ids[0], Some("completed")),
            second.execute(&who, &ids[1], Some("completed")),
        );

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));
    }

    #[tokio::test]
    async fn test_queries() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let other = w.user("other@example.com", UserRole::Provider).await;
        let admin = w.user("admin@example.com", UserRole::Administrator).await;
        let client = w.user("client@example.com", UserRole::Client).await;
        let tee = w.product(provider.user_id, &[("M", 5)]).await;
        let gone = w.product(other.user_id, &[("M", 5)]).await;
        let create = CreateOrderUseCase::new(w.orders.clone(), w.products.clone(), w.config.clone());

        let mine = create
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&tee, "M", 1)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();
        create
            .execute(
                &identity(&client),
                CreateOrderInput {
                    items: vec![item(&gone, "M", 1)],
                    total_amount: None,
                },
            )
            .await
            .unwrap();
        w.products.delete(&gone.product_id).await.unwrap();

        SetOrderStatusUseCase::new(w.orders.clone())
            .execute(&identity(&provider), &mine.order_id.to_string(), Some("completed"))
            .await
            .unwrap();

        let queries = OrderQueries::new(w.orders.clone(), w.products.clone());

        let listed = queries.list_mine(&identity(&client)).await.unwrap();
        assert_eq!(listed.len(), 2);
        let with_summary = listed
            .iter()
            .find(|d| d.order.order_id == mine.order_id)
            .unwrap();
        assert_eq!(with_summary.lines[0].product.as_ref().unwrap().name, "Tee");
        let without = listed
            .iter()
            .find(|d| d.order.order_id != mine.order_id)
            .unwrap();
        assert!(without.lines[0].product.is_none());

        assert_eq!(queries.list_related(&identity(&provider)).await.unwrap().len(), 1);
        assert_eq!(queries.list_related(&identity(&other)).await.unwrap().len(), 1);
        assert_eq!(queries.list_related(&identity(&admin)).await.unwrap().len(), 2);
        assert!(queries.list_related(&identity(&client)).await.is_err());

        assert_eq!(queries.count_completed(&identity(&provider)).await.unwrap(), 1);
        assert_eq!(queries.count_completed(&identity(&other)).await.unwrap(), 0);
        assert_eq!(queries.count_completed(&identity(&admin)).await.unwrap(), 1);
        assert!(queries.list_mine(&identity(&admin)).await.unwrap().is_empty());
        assert_eq!(w.products.count_in_stock().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_validate_cart() {
        let w = world();
        let provider = w.user("prov@example.com", UserRole::Provider).await;
        let tee = w.product(provider.user_id, &[("M", 2), ("L", 0)]).await;
        let missing = kernel::id::ProductId::new();

        let quote = ValidateCartUseCase::new(w.products.clone())
            .execute(vec![
                item(&tee, "M", 1),
                item(&tee, "M", 1),
                item(&tee, "L", 1),
                item(&tee, "XS", 1),
                OrderItemInput {
                    product_id: Some(missing.to_string()),
                    ..item(&tee, "M", 1)
                },
            ])
            .await
            .unwrap();

        assert!(!quote.is_valid());
        assert_eq!(quote.cart.lines().len(), 1);
        assert_eq!(quote.cart.lines()[0].quantity, 2);
        assert_eq!(quote.total(), Decimal::new(2000, 2));

        let reasons: Vec<_> = quote.shortfalls.iter().map(|s| s.reason.clone()).collect();
        assert_eq!(reasons.len(), 3);
        assert!(reasons.contains(&ShortfallReason::InsufficientStock));
        assert!(reasons.contains(&ShortfallReason::SizeNotStocked));
        assert!(reasons.contains(&ShortfallReason::ProductMissing));
        assert_eq!(w.stock_of(&tee, "M").await, Some(2));

        assert!(matches!(
            ValidateCartUseCase::new(w.products.clone()).execute(vec![]).await,
            Err(OrderError::Validation(_))
        ));
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use auth::{User, UserRole};
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use platform::token::TokenSigner;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::fixtures::{World, world};
    use crate::presentation::router::orders_router_generic;

    struct Harness {
        world: World,
        app: Router,
        tokens: Arc<TokenSigner>,
    }

    fn harness() -> Harness {
        let world = world();
        let tokens = Arc::new(TokenSigner::new(b"orders-secret", 3600));
        let app = orders_router_generic(
            world.orders.clone(),
            world.products.clone(),
            world.users.clone(),
            tokens.clone(),
            world.config.clone(),
        );
        Harness { world, app, tokens }
    }

    impl Harness {
        async fn login(&self, email: &str, role: UserRole) -> (User, String) {
            let user = self.world.user(email, role).await;
            let token = self
                .tokens
                .issue(user.user_id.into_uuid(), user.role.code())
                .unwrap();
            (user, token)
        }

        async fn send(&self, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }
    }

    #[tokio::test]
    async fn test_order_lifecycle() {
        let h = harness();
        let (provider, provider_token) = h.login("prov@example.com", UserRole::Provider).await;
        let (_, client_token) = h.login("client@example.com", UserRole::Client).await;
        let tee = h.world.product(provider.user_id, &[("M", 5)]).await;

        let (status, body) = h
            .send(
                "POST",
                "/simulate-order",
                Some(json!({
                    "products": [{"productId": tee.product_id.to_string(), "size": "M", "quantity": 3}],
                    "totalAmount": 30
                })),
                Some(&client_token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["order"]["status"], "pending");
        assert_eq!(body["order"]["products"][0]["providerId"], json!(provider.user_id.to_string()));
        let uri = format!("/{}", body["order"]["id"].as_str().unwrap());

        let (status, body) = h.send("GET", "/", None, Some(&client_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["products"][0]["product"]["name"], "Tee");

        let (status, _) = h
            .send("PUT", &uri, Some(json!({"status": "completed"})), Some(&client_token))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = h
            .send("PUT", &uri, Some(json!({"status": "completed"})), Some(&provider_token))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"]["status"], "completed");
        assert_eq!(h.world.stock_of(&tee, "M").await, Some(2));

        let (status, body) = h
            .send("PUT", &uri, Some(json!({"status": "completed"})), Some(&provider_token))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Order is already completed");

        let (status, body) = h.send("GET", "/completed", None, Some(&provider_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"completedOrders": 1}));

        let (status, body) = h.send("GET", "/related", None, Some(&provider_token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_routes_need_token_and_role() {
        let h = harness();
        let (_, client_token) = h.login("client@example.com", UserRole::Client).await;

        let (status, _) = h.send("GET", "/", None, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = h.send("GET", "/related", None, Some(&client_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = h.send("GET", "/completed", None, Some(&client_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = h
            .send("POST", "/simulate-order", Some(json!({"products": []})), Some(&client_token))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "The order has no products");
    }

    #[tokio::test]
    async fn test_validate_cart_route() {
        let h = harness();
        let (provider, _) = h.login("prov@example.com", UserRole::Provider).await;
        let (_, client_token) = h.login("client@example.com", UserRole::Client).await;
        let tee = h.world.product(provider.user_id, &[("M", 1)]).await;

        let (status, body) = h
            .send(
                "POST",
                "/validate-cart",
                Some(json!({"items": [{"productId": tee.product_id.to_string(), "size": "M", "quantity": 2}]})),
                Some(&client_token),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], json!(false));
        assert_eq!(body["shortfalls"][0]["reason"], "insufficient-stock");
        assert_eq!(body["shortfalls"][0]["available"], json!(1));
    }
}
