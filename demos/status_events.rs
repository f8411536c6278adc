use kmeans_kernels::*;

fn main() {
    let (sample_cnt, k) = (100000, 16);

    // Generate some random data
    let mut samples = vec![0.0f64; sample_cnt * DEFAULT_DIM];
    samples.iter_mut().for_each(|v| *v = rand::random());

    let conf = KernelConfig::build()
        .chunk_size(2048)
        .lanes_per_unit(4)
        .threads(4)
        .launch_done(&|report| println!("{} done - {} units over {} items in {:?}",
            report.kernel, report.units, report.items, report.elapsed))
        .build();
    let kernels: KMeansKernels<f64> = KMeansKernels::new(conf).unwrap();

    let mut accumulator = CentroidAccumulator::new(k);
    let step = kernels.lloyd_step(&samples, &samples[..k * DEFAULT_DIM], sample_cnt, &mut accumulator).unwrap();
    println!("Error: {}", step.distsum);
}
