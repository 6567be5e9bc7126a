use paygate::domain::merchant::Merchant;
use paygate::domain::order::{Order, OrderRequest};
use paygate::domain::payment::{Instrument, Payment, PaymentStatus};
use paygate::domain::ports::{AuthenticationGateBox, OrderStoreBox, PaymentStoreBox};
use paygate::infrastructure::in_memory::{
    InMemoryMerchantDirectory, InMemoryOrderStore, InMemoryPaymentStore,
};

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let order_store: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let payment_store: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());
    let gate: AuthenticationGateBox = Box::new(InMemoryMerchantDirectory::with_test_merchant().await);

    let merchant = Merchant::test_merchant();
    let order = Order::create(merchant.id, OrderRequest::new(500));
    let payment = Payment::open(
        &order,
        Instrument::Upi {
            vpa: "user@bank".to_string(),
        },
    );
    let order_id = order.id.clone();
    let payment_id = payment.id.clone();

    // Verify Send + Sync by spawning tasks
    let orders_handle = tokio::spawn(async move {
        order_store.insert(order).await.unwrap();
        order_store.get(&order_id).await.unwrap().unwrap()
    });

    let payments_handle = tokio::spawn(async move {
        payment_store.insert(payment).await.unwrap();
        payment_store.get(&payment_id).await.unwrap().unwrap()
    });

    let credentials = merchant.credentials.clone();
    let gate_handle = tokio::spawn(async move { gate.authenticate(&credentials).await.unwrap() });

    let retrieved_order = orders_handle.await.unwrap();
    assert_eq!(retrieved_order.merchant_id, merchant.id);

    let retrieved_payment = payments_handle.await.unwrap();
    assert_eq!(retrieved_payment.status, PaymentStatus::Processing);
    assert_eq!(retrieved_payment.order_id, retrieved_order.id);

    let authenticated = gate_handle.await.unwrap();
    assert_eq!(authenticated.id, merchant.id);
}
