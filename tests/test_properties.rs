use proptest::prelude::*;

use fjsp_evo::{
    chromosome::{Chromosome, Objectives},
    fitness::Evaluator,
    instance::Instance,
    operators::{
        half_mask, job_partition_crossover, machine_reassignment_crossover, repair, JobPartition,
    },
    ranking,
    rng::RandomNumberGenerator,
};

fn job_counts(chromosome: &Chromosome, num_jobs: usize) -> Vec<usize> {
    let mut counts = vec![0; num_jobs];
    for &job in chromosome.job_tags() {
        counts[job] += 1;
    }
    counts
}

prop_compose! {
    fn arb_instance()(
        num_jobs in 1usize..6,
        num_machines in 1usize..5,
        extra_operations in 0usize..10,
        seed in any::<u64>(),
    ) -> Instance {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        Instance::generate(num_jobs, num_machines, num_jobs + extra_operations, 10, &mut rng)
            .unwrap()
    }
}

proptest! {
    #[test]
    fn dominance_is_irreflexive_and_asymmetric(
        a in (0u64..50, 0u64..50),
        b in (0u64..50, 0u64..50),
    ) {
        let a = Objectives::new(a.0, a.1);
        let b = Objectives::new(b.0, b.1);

        prop_assert!(!a.dominates(&a));
        prop_assert!(!(a.dominates(&b) && b.dominates(&a)));
    }

    #[test]
    fn job_partition_crossover_preserves_operation_counts(
        instance in arb_instance(),
        seed in any::<u64>(),
    ) {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let a = Chromosome::random(&instance, &mut rng);
        let b = Chromosome::random(&instance, &mut rng);
        let partition = JobPartition::random(instance.num_jobs(), &mut rng);

        let (mut child_a, mut child_b) = job_partition_crossover(&a, &b, &partition).unwrap();
        repair(&mut child_a, &instance, &mut rng).unwrap();
        repair(&mut child_b, &instance, &mut rng).unwrap();

        let expected = instance.operation_counts();
        prop_assert_eq!(job_counts(&child_a, instance.num_jobs()), expected.clone());
        prop_assert_eq!(job_counts(&child_b, instance.num_jobs()), expected);
        prop_assert!(child_a.is_valid(&instance));
        prop_assert!(child_b.is_valid(&instance));
    }

    #[test]
    fn machine_reassignment_keeps_job_order(
        instance in arb_instance(),
        seed in any::<u64>(),
    ) {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let a = Chromosome::random(&instance, &mut rng);
        let b = Chromosome::random(&instance, &mut rng);
        let mask = half_mask(a.len(), &mut rng);

        let (child_a, child_b) = machine_reassignment_crossover(&a, &b, &mask).unwrap();

        prop_assert_eq!(child_a.job_tags(), a.job_tags());
        prop_assert_eq!(child_b.job_tags(), b.job_tags());
        prop_assert!(child_a.is_valid(&instance));
        prop_assert!(child_b.is_valid(&instance));
    }

    #[test]
    fn makespan_never_exceeds_total_load(
        instance in arb_instance(),
        seed in any::<u64>(),
    ) {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let chromosome = Chromosome::random(&instance, &mut rng);
        let objectives = Evaluator::new(&instance).evaluate(&chromosome).unwrap();

        prop_assert!(objectives.makespan > 0);
        prop_assert!(objectives.makespan <= objectives.total_load);
    }

    #[test]
    fn fronts_partition_and_front_zero_is_non_dominated_set(
        instance in arb_instance(),
        seed in any::<u64>(),
        size in 1usize..30,
    ) {
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let evaluator = Evaluator::new(&instance);
        let mut population: Vec<Chromosome> =
            (0..size).map(|_| Chromosome::random(&instance, &mut rng)).collect();
        evaluator.evaluate_all(population.iter_mut()).unwrap();

        let fronts = ranking::rank(&mut population).unwrap();

        let mut members: Vec<usize> = fronts.iter().flatten().copied().collect();
        members.sort_unstable();
        prop_assert_eq!(members, (0..size).collect::<Vec<_>>());

        let non_dominated: Vec<usize> = (0..size)
            .filter(|&i| population.iter().all(|other| !other.dominates(&population[i])))
            .collect();
        let mut front_zero = fronts[0].clone();
        front_zero.sort_unstable();
        prop_assert_eq!(front_zero, non_dominated);
    }
}
