use kmeans_kernels::*;

fn main() {
    let (sample_cnt, bins, k, batch_size) = (50000, 8, 3, 4096);

    // Random 8-bin histograms, each normalized to a total mass of 1
    let mut samples = vec![0.0f32; sample_cnt * bins];
    samples.chunks_exact_mut(bins).for_each(|h| {
        h.iter_mut().for_each(|v| *v = rand::random());
        let mass: f32 = h.iter().sum();
        h.iter_mut().for_each(|v| *v /= mass);
    });
    let centroids = samples[..k * bins].to_vec();

    let conf = KernelConfig::build()
        .metric(Metric::CumulativeDifference)
        .chunk_size(512)
        .build();
    let kernels: KMeansKernels<f32, 8> = KMeansKernels::new(conf).unwrap();

    // Only batch_size × k distances are kept in memory at a time
    let mut accumulator = CentroidAccumulator::new(k);
    let result = kernels.accumulate_batches(&samples, &centroids, sample_cnt, batch_size, &mut accumulator).unwrap();

    println!("Batches: {}", unit_count(sample_cnt, batch_size));
    println!("Error: {}", result.distsum);
    println!("Cluster-Sizes: {:?}", accumulator.counts());
    println!("Cluster-Sums: {:?}", accumulator.sums());
}
