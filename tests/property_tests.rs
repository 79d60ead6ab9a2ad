use mnist_mlp::activation::{logistic, softmax};
use mnist_mlp::{ActivationFunction, Layer, NetworkSpec};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn logits_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0f64..1000.0, 1..=12)
}

fn activation_strategy() -> impl Strategy<Value = ActivationFunction> {
    prop_oneof![
        Just(ActivationFunction::Sigmoid),
        Just(ActivationFunction::ReLU),
        Just(ActivationFunction::Softmax),
    ]
}

proptest! {
    #[test]
    fn softmax_is_a_distribution(z in logits_strategy()) {
        let y = softmax(&z);
        prop_assert_eq!(y.len(), z.len());
        prop_assert!(y.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)));
        prop_assert!((y.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn logistic_stays_inside_unit_interval(z in -30.0f64..30.0) {
        let y = logistic(z);
        prop_assert!(y > 0.0 && y < 1.0);
    }

    #[test]
    fn sigmoid_layer_output_is_bounded(
        seed in any::<u64>(),
        input in prop::collection::vec(-5.0f64..5.0, 3),
    ) {
        let mut layer = Layer::new(6, 3, ActivationFunction::Sigmoid, &mut StdRng::seed_from_u64(seed));
        let out = layer.feed_forward(&input).unwrap();
        prop_assert!(out.iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn output_width_matches_layer_size(
        seed in any::<u64>(),
        size in 1usize..16,
        activation in activation_strategy(),
        input in prop::collection::vec(-50.0f64..50.0, 4),
    ) {
        let mut layer = Layer::new(size, 4, activation, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(layer.feed_forward(&input).unwrap().len(), size);
    }

    #[test]
    fn feed_forward_is_idempotent(
        seed in any::<u64>(),
        input in prop::collection::vec(0.0f64..1.0, 5),
    ) {
        let spec = NetworkSpec::classifier(5, &[7, 4], 3, ActivationFunction::ReLU);
        let mut net = spec.build(&mut StdRng::seed_from_u64(seed)).unwrap();
        let first = net.feed_forward(&input).unwrap().to_vec();
        let second = net.feed_forward(&input).unwrap().to_vec();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn weight_shapes_survive_training(
        seed in any::<u64>(),
        label in 0usize..3,
        input in prop::collection::vec(0.0f64..1.0, 5),
    ) {
        let spec = NetworkSpec::classifier(5, &[4], 3, ActivationFunction::Sigmoid);
        let mut net = spec.build(&mut StdRng::seed_from_u64(seed)).unwrap();
        net.train(&[input], &[label], 2).unwrap();
        prop_assert_eq!(net.layers[0].weights().shape(), (4, 5));
        prop_assert_eq!(net.layers[1].weights().shape(), (3, 4));
    }
}
