use kmeans_kernels::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let (sample_cnt, k, max_iter) = (20000, 4, 20);

    // Generate some random data
    let mut samples = vec![0.0f64; sample_cnt * DEFAULT_DIM];
    samples.iter_mut().for_each(|v| *v = rand::random());

    // Host side: first k samples as initial centroids, fixed amount of iterations
    let mut centroids = samples[..k * DEFAULT_DIM].to_vec();
    let kernels: KMeansKernels<f64> = KMeansKernels::new(KernelConfig::default()).unwrap();
    let mut accumulator = CentroidAccumulator::new(k);
    for i in 0..max_iter {
        accumulator.reset();
        let step = kernels.lloyd_step(&samples, &centroids, sample_cnt, &mut accumulator).unwrap();
        println!("Iteration {} - Error: {:.4}", i, step.distsum);

        // Empty clusters keep their previous position
        for (c, count) in accumulator.counts().iter().cloned().enumerate().filter(|&(_, count)| count > 0) {
            let sum = accumulator.cluster_sum(c).unwrap();
            centroids[c * DEFAULT_DIM..(c + 1) * DEFAULT_DIM].iter_mut()
                .zip(sum.iter())
                .for_each(|(dst, s)| *dst = s / count as f64);
        }
    }

    println!("Centroids: {:?}", centroids);
    println!("Cluster-Sizes: {:?}", accumulator.counts());
}
