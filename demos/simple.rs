use typed_notify::{bus::Bus, notification, Observer};

typed_notify::declare! {
    notification Sum((i32, i32));
    notification Mul((i32, i32)) = "demo.mul";

    notification Ready(&'static str);
    notification Close(()) = "demo.close";
}

fn sum_listener(bus: &Bus, observer: &Observer) {
    notification::observe::<Sum, _>(bus, observer, |(a, b)| {
        println!("Sum posted with: ({}, {}) = {}", a, b, a + b);
    });
    Ready::post(bus, "sum");
}

fn mul_listener(bus: &Bus, observer: &Observer) {
    notification::observe::<Mul, _>(bus, observer, |(a, b)| {
        println!("Mul posted with: ({}, {}) = {}", a, b, a * b);
    });
    Ready::post(bus, "mul");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let bus = Bus::new();
    let mut ready = bus.subscribe::<Ready>();
    let mut close = bus.subscribe::<Close>();

    let listeners = Observer::new();
    sum_listener(&bus, &listeners);
    mul_listener(&bus, &listeners);
    for _ in 0..2 {
        let name = ready.recv_payload().await.expect("bus dropped");
        println!("{} listener is ready", name);
    }

    Sum::post(&bus, (5, 10));
    Mul::post(&bus, (5, 10));

    let closer = {
        let bus = bus.clone();
        tokio::spawn(async move {
            Close::post(&bus, ());
        })
    };
    close.recv().await.expect("bus dropped");
    closer.await.expect("closer panicked");

    drop(listeners);
    assert_eq!(Sum::post(&bus, (1, 1)), 0);
}
